//! Dash converter for vertex sources.
//!
//! Port of `agg_conv_dash.h`: `ConvAdaptorVcgen` paired with `VcgenDash`.

use crate::basics::VertexSource;
use crate::conv_adaptor_vcgen::ConvAdaptorVcgen;
use crate::dash_pattern::DashPattern;
use crate::vcgen_dash::VcgenDash;

// ============================================================================
// ConvDash
// ============================================================================

/// Dash converter: generates a dashed line from a continuous center-line path.
///
/// Each sub-path of the source is dashed on its own, starting at the
/// [`dash_start`](Self::dash_start) phase.
///
/// Port of C++ `conv_dash<VertexSource>`.
#[derive(Debug, Clone)]
pub struct ConvDash<VS> {
    base: ConvAdaptorVcgen<VS, VcgenDash>,
}

impl<VS: VertexSource> ConvDash<VS> {
    pub fn new(source: VS) -> Self {
        Self {
            base: ConvAdaptorVcgen::new(source, VcgenDash::new()),
        }
    }

    /// Create a converter with `pattern` already applied.
    pub fn with_pattern(source: VS, pattern: &DashPattern) -> Self {
        let mut dash = Self::new(source);
        dash.set_pattern(pattern);
        dash
    }

    pub fn remove_all_dashes(&mut self) {
        self.base.generator_mut().remove_all_dashes();
    }

    pub fn add_dash(&mut self, dash_len: f64, gap_len: f64) {
        self.base.generator_mut().add_dash(dash_len, gap_len);
    }

    pub fn set_pattern(&mut self, pattern: &DashPattern) {
        self.base.generator_mut().set_pattern(pattern);
    }

    pub fn dash_start(&mut self, ds: f64) {
        self.base.generator_mut().dash_start(ds);
    }

    pub fn set_shorten(&mut self, s: f64) {
        self.base.generator_mut().set_shorten(s);
    }

    pub fn shorten(&self) -> f64 {
        self.base.generator().shorten()
    }

    pub fn source(&self) -> &VS {
        self.base.source()
    }

    pub fn source_mut(&mut self) -> &mut VS {
        self.base.source_mut()
    }
}

impl<VS: VertexSource> VertexSource for ConvDash<VS> {
    fn rewind(&mut self, path_id: u32) {
        self.base.rewind(path_id);
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        self.base.vertex(x, y)
    }
}

// ============================================================================
// Tests
// ============================================================================
