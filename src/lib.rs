//! # agg-geometry
//!
//! The path geometry core of Anti-Grain Geometry (AGG) 2.6: generators that
//! turn arcs and polylines into flat vertex streams for a rasterizer.
//!
//! - Path command vocabulary shared by every vertex source
//! - Elliptical arc to cubic Bezier conversion
//! - SVG endpoint arc parameterization
//! - Dash pattern generation over open and closed polylines
//!
//! ## Architecture
//!
//! Every component implements the pull-style [`basics::VertexSource`]
//! protocol: `rewind()` restarts iteration and `vertex()` returns one vertex
//! per call until it reports `PATH_CMD_STOP`. Generators can be chained:
//!
//! ```
//! use agg_geometry::basics::{vertices, PATH_CMD_LINE_TO};
//! use agg_geometry::conv_dash::ConvDash;
//! use agg_geometry::path_storage::PathStorage;
//!
//! let mut path = PathStorage::new();
//! path.move_to(0.0, 0.0);
//! path.line_to(10.0, 0.0);
//!
//! let mut dash = ConvDash::new(path);
//! dash.add_dash(3.0, 2.0);
//! let drawn = vertices(&mut dash)
//!     .filter(|v| v.cmd == PATH_CMD_LINE_TO)
//!     .count();
//! assert_eq!(drawn, 2);
//! ```

// Foundation types & math
pub mod array;
pub mod basics;
pub mod math;
pub mod trans_affine;

// Vertex sources and generators
pub mod bezier_arc;
pub mod dash_pattern;
pub mod path_storage;
pub mod vcgen_dash;

// Converters
pub mod conv_adaptor_vcgen;
pub mod conv_dash;
