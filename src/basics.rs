//! Foundation types, constants, and path command utilities.
//!
//! Port of the path-command part of `agg_basics.h`: the 8-bit command
//! vocabulary every vertex source speaks, plus the `VertexSource` trait
//! that ties generators, converters and consumers together.

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Mathematical constants
// ============================================================================

pub const PI: f64 = std::f64::consts::PI;

/// Convert degrees to radians. SVG gives the arc x-axis rotation in
/// degrees; the arc generators take radians.
#[inline]
pub fn deg2rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Convert radians to degrees.
#[inline]
pub fn rad2deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

// ============================================================================
// Path commands
// ============================================================================

pub const PATH_CMD_STOP: u32 = 0;
pub const PATH_CMD_MOVE_TO: u32 = 1;
pub const PATH_CMD_LINE_TO: u32 = 2;
pub const PATH_CMD_CURVE3: u32 = 3;
pub const PATH_CMD_CURVE4: u32 = 4;
pub const PATH_CMD_CURVE_N: u32 = 5;
pub const PATH_CMD_CATROM: u32 = 6;
pub const PATH_CMD_UBSPLINE: u32 = 7;
pub const PATH_CMD_END_POLY: u32 = 0x0F;
pub const PATH_CMD_MASK: u32 = 0x0F;

// ============================================================================
// Path flags
// ============================================================================

pub const PATH_FLAGS_NONE: u32 = 0;
pub const PATH_FLAGS_CCW: u32 = 0x10;
pub const PATH_FLAGS_CW: u32 = 0x20;
pub const PATH_FLAGS_CLOSE: u32 = 0x40;
pub const PATH_FLAGS_MASK: u32 = 0xF0;

// ============================================================================
// Path command query functions
// ============================================================================

/// Returns `true` if `c` is a vertex command (move_to through curveN).
#[inline]
pub fn is_vertex(c: u32) -> bool {
    (PATH_CMD_MOVE_TO..PATH_CMD_END_POLY).contains(&c)
}

/// Returns `true` if `c` is a drawing command (line_to through curveN).
#[inline]
pub fn is_drawing(c: u32) -> bool {
    (PATH_CMD_LINE_TO..PATH_CMD_END_POLY).contains(&c)
}

#[inline]
pub fn is_stop(c: u32) -> bool {
    c == PATH_CMD_STOP
}

#[inline]
pub fn is_move_to(c: u32) -> bool {
    c == PATH_CMD_MOVE_TO
}

#[inline]
pub fn is_line_to(c: u32) -> bool {
    c == PATH_CMD_LINE_TO
}

/// Returns `true` if `c` is a curve command (curve3 or curve4).
#[inline]
pub fn is_curve(c: u32) -> bool {
    c == PATH_CMD_CURVE3 || c == PATH_CMD_CURVE4
}

/// Returns `true` if `c` is an end_poly command (with any flags).
#[inline]
pub fn is_end_poly(c: u32) -> bool {
    (c & PATH_CMD_MASK) == PATH_CMD_END_POLY
}

/// Returns `true` if `c` closes a polygon, regardless of orientation.
#[inline]
pub fn is_close(c: u32) -> bool {
    clear_orientation(c) == (PATH_CMD_END_POLY | PATH_FLAGS_CLOSE)
}

/// Returns `true` if `c` starts a new polygon (stop, move_to, or end_poly).
#[inline]
pub fn is_next_poly(c: u32) -> bool {
    is_stop(c) || is_move_to(c) || is_end_poly(c)
}

#[inline]
pub fn is_cw(c: u32) -> bool {
    (c & PATH_FLAGS_CW) != 0
}

#[inline]
pub fn is_ccw(c: u32) -> bool {
    (c & PATH_FLAGS_CCW) != 0
}

/// Returns `true` if `c` has any orientation flag set.
#[inline]
pub fn is_oriented(c: u32) -> bool {
    (c & (PATH_FLAGS_CW | PATH_FLAGS_CCW)) != 0
}

#[inline]
pub fn is_closed(c: u32) -> bool {
    (c & PATH_FLAGS_CLOSE) != 0
}

/// Extract the close flag from a command.
#[inline]
pub fn get_close_flag(c: u32) -> u32 {
    c & PATH_FLAGS_CLOSE
}

/// Remove orientation flags from a command.
#[inline]
pub fn clear_orientation(c: u32) -> u32 {
    c & !(PATH_FLAGS_CW | PATH_FLAGS_CCW)
}

/// Extract the orientation flags from a command.
#[inline]
pub fn get_orientation(c: u32) -> u32 {
    c & (PATH_FLAGS_CW | PATH_FLAGS_CCW)
}

/// Replace the orientation flags of a command.
#[inline]
pub fn set_orientation(c: u32, o: u32) -> u32 {
    clear_orientation(c) | o
}

// ============================================================================
// Typed path commands
// ============================================================================

/// Polygon orientation carried by an `end_poly` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Orientation {
    None,
    Ccw,
    Cw,
}

impl Orientation {
    /// The flag bits for this orientation.
    pub fn flags(self) -> u32 {
        match self {
            Orientation::None => PATH_FLAGS_NONE,
            Orientation::Ccw => PATH_FLAGS_CCW,
            Orientation::Cw => PATH_FLAGS_CW,
        }
    }
}

/// Typed view of the integer command vocabulary.
///
/// The integer tags stay the wire format between vertex sources; this enum
/// exists for callers that want to `match` on commands instead of masking
/// bits. Conversions are lossless in both directions for every tag the
/// vocabulary defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum PathCommand {
    Stop,
    MoveTo,
    LineTo,
    Curve3,
    Curve4,
    CurveN,
    Catrom,
    UBSpline,
    EndPoly {
        orientation: Orientation,
        closed: bool,
    },
}

impl PathCommand {
    /// Shorthand for a closed, unoriented `end_poly`.
    pub fn close() -> Self {
        PathCommand::EndPoly {
            orientation: Orientation::None,
            closed: true,
        }
    }

    pub fn is_vertex(self) -> bool {
        is_vertex(self.into())
    }

    pub fn is_drawing(self) -> bool {
        is_drawing(self.into())
    }
}

/// Error returned when an integer tag is not part of the command vocabulary.
#[non_exhaustive]
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown path command {0:#04x}.")]
    Unknown(u32),
}

impl From<PathCommand> for u32 {
    fn from(cmd: PathCommand) -> u32 {
        match cmd {
            PathCommand::Stop => PATH_CMD_STOP,
            PathCommand::MoveTo => PATH_CMD_MOVE_TO,
            PathCommand::LineTo => PATH_CMD_LINE_TO,
            PathCommand::Curve3 => PATH_CMD_CURVE3,
            PathCommand::Curve4 => PATH_CMD_CURVE4,
            PathCommand::CurveN => PATH_CMD_CURVE_N,
            PathCommand::Catrom => PATH_CMD_CATROM,
            PathCommand::UBSpline => PATH_CMD_UBSPLINE,
            PathCommand::EndPoly {
                orientation,
                closed,
            } => {
                let close = if closed { PATH_FLAGS_CLOSE } else { PATH_FLAGS_NONE };
                PATH_CMD_END_POLY | orientation.flags() | close
            }
        }
    }
}

impl TryFrom<u32> for PathCommand {
    type Error = CommandError;

    fn try_from(c: u32) -> Result<Self, CommandError> {
        if is_end_poly(c) {
            let flags = c & !PATH_CMD_MASK;
            let known = PATH_FLAGS_CW | PATH_FLAGS_CCW | PATH_FLAGS_CLOSE;
            if flags & !known != 0 {
                return Err(CommandError::Unknown(c));
            }
            let orientation = match get_orientation(c) {
                PATH_FLAGS_NONE => Orientation::None,
                PATH_FLAGS_CCW => Orientation::Ccw,
                PATH_FLAGS_CW => Orientation::Cw,
                _ => return Err(CommandError::Unknown(c)),
            };
            return Ok(PathCommand::EndPoly {
                orientation,
                closed: is_closed(c),
            });
        }
        Ok(match c {
            PATH_CMD_STOP => PathCommand::Stop,
            PATH_CMD_MOVE_TO => PathCommand::MoveTo,
            PATH_CMD_LINE_TO => PathCommand::LineTo,
            PATH_CMD_CURVE3 => PathCommand::Curve3,
            PATH_CMD_CURVE4 => PathCommand::Curve4,
            PATH_CMD_CURVE_N => PathCommand::CurveN,
            PATH_CMD_CATROM => PathCommand::Catrom,
            PATH_CMD_UBSPLINE => PathCommand::UBSpline,
            _ => return Err(CommandError::Unknown(c)),
        })
    }
}

// ============================================================================
// Vertex
// ============================================================================

/// A vertex with coordinates and a path command.
/// Port of C++ `vertex_base<T>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexBase<T: Copy> {
    pub x: T,
    pub y: T,
    pub cmd: u32,
}

impl<T: Copy> VertexBase<T> {
    pub fn new(x: T, y: T, cmd: u32) -> Self {
        Self { x, y, cmd }
    }
}

pub type VertexD = VertexBase<f64>;

// ============================================================================
// VertexSource trait
// ============================================================================

/// The fundamental vertex source interface. Every generator, converter and
/// path container in this crate implements it to produce a stream of
/// vertices.
///
/// Port of the C++ "vertex source concept", the implicit interface that
/// all AGG vertex sources implement via duck typing (template parameters).
pub trait VertexSource {
    /// Reset the vertex source to the beginning of the given path.
    /// `path_id` selects which sub-path to iterate (0 for the first/only path).
    fn rewind(&mut self, path_id: u32);

    /// Return the next vertex. Writes coordinates to `x` and `y`, returns a
    /// path command. Returns `PATH_CMD_STOP` when iteration is complete.
    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32;
}

/// Blanket implementation so `&mut T` can be used as a VertexSource.
/// This allows pipeline stages to borrow their source instead of owning it.
impl<T: VertexSource> VertexSource for &mut T {
    fn rewind(&mut self, path_id: u32) {
        (*self).rewind(path_id);
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        (*self).vertex(x, y)
    }
}

/// Iterator over the vertices of a [`VertexSource`], ending at `stop`.
pub struct Vertices<'a, VS: VertexSource + ?Sized> {
    source: &'a mut VS,
    done: bool,
}

impl<'a, VS: VertexSource + ?Sized> Iterator for Vertices<'a, VS> {
    type Item = VertexD;

    fn next(&mut self) -> Option<VertexD> {
        if self.done {
            return None;
        }
        let (mut x, mut y) = (0.0, 0.0);
        let cmd = self.source.vertex(&mut x, &mut y);
        if is_stop(cmd) {
            self.done = true;
            return None;
        }
        Some(VertexD::new(x, y, cmd))
    }
}

/// Rewind `source` to path 0 and iterate its vertices.
pub fn vertices<VS: VertexSource + ?Sized>(source: &mut VS) -> Vertices<'_, VS> {
    path_vertices(source, 0)
}

/// Rewind `source` to `path_id` and iterate its vertices.
pub fn path_vertices<VS: VertexSource + ?Sized>(
    source: &mut VS,
    path_id: u32,
) -> Vertices<'_, VS> {
    source.rewind(path_id);
    Vertices {
        source,
        done: false,
    }
}

// ============================================================================
// Tests
// ============================================================================
