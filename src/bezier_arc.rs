//! Bezier arc generator.
//!
//! Port of `agg_bezier_arc.h` / `agg_bezier_arc.cpp`. Converts elliptical
//! arcs into sequences of cubic Bezier curves. Produces at most 4 consecutive
//! cubic Bezier curves (4, 7, 10, or 13 vertices).

use log::{debug, trace};

use crate::basics::{
    VertexSource, PATH_CMD_CURVE4, PATH_CMD_LINE_TO, PATH_CMD_MOVE_TO, PATH_CMD_STOP, PI,
};
use crate::math::calc_distance;
use crate::trans_affine::TransAffine;

/// Epsilon to prevent adding degenerate curves.
const BEZIER_ARC_ANGLE_EPSILON: f64 = 0.01;

/// Sweeps smaller than this produce a straight segment instead of curves.
const BEZIER_ARC_MIN_SWEEP: f64 = 1e-10;

/// Capacity of the coordinate buffer: 13 points, 2 values each.
pub const BEZIER_ARC_MAX_VALUES: usize = 26;

/// Radii or endpoint distances below this make an SVG arc degenerate.
pub const SVG_ARC_EPSILON: f64 = 1e-30;

/// Scaling past this radii-check value marks the SVG arc as degraded.
const SVG_ARC_RADII_LIMIT: f64 = 10.0;

/// Wrap `angle` into `[0, 2π)`.
///
/// `rem_euclid` rounds tiny negative angles up to exactly `2π`; those map
/// to `0.0`.
fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(2.0 * PI);
    if a >= 2.0 * PI {
        0.0
    } else {
        a
    }
}

/// Convert an arc segment to a single cubic Bezier curve (4 control points).
///
/// Writes 8 values to `curve`: `[x0, y0, x1, y1, x2, y2, x3, y3]`.
/// `sweep_angle` must be non-zero and at most `π/2` in magnitude for the
/// approximation to stay within tolerance.
pub fn arc_to_bezier(
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    start_angle: f64,
    sweep_angle: f64,
    curve: &mut [f64],
) {
    let x0 = (sweep_angle / 2.0).cos();
    let y0 = (sweep_angle / 2.0).sin();
    let tx = (1.0 - x0) * 4.0 / 3.0;
    let ty = y0 - tx * x0 / y0;

    let px = [x0, x0 + tx, x0 + tx, x0];
    let py = [-y0, -ty, ty, y0];

    let (sn, cs) = (start_angle + sweep_angle / 2.0).sin_cos();

    for i in 0..4 {
        curve[i * 2] = cx + rx * (px[i] * cs - py[i] * sn);
        curve[i * 2 + 1] = cy + ry * (px[i] * sn + py[i] * cs);
    }
}

/// Bezier arc generator.
///
/// Generates up to 4 consecutive cubic Bezier curves from an elliptical arc.
/// The geometry is computed once by [`init`](Self::init); iteration only
/// moves a cursor over it.
///
/// Port of C++ `agg::bezier_arc`.
#[derive(Debug, Clone)]
pub struct BezierArc {
    vertex: usize,
    num_vertices: usize,
    vertices: [f64; BEZIER_ARC_MAX_VALUES],
    cmd: u32,
}

impl BezierArc {
    /// Create an empty bezier arc. It yields `stop` until initialized.
    pub fn new() -> Self {
        Self {
            vertex: BEZIER_ARC_MAX_VALUES,
            num_vertices: 0,
            vertices: [0.0; BEZIER_ARC_MAX_VALUES],
            cmd: PATH_CMD_LINE_TO,
        }
    }

    /// Create and initialize a bezier arc.
    pub fn new_with_params(
        x: f64,
        y: f64,
        rx: f64,
        ry: f64,
        start_angle: f64,
        sweep_angle: f64,
    ) -> Self {
        let mut arc = Self::new();
        arc.init(x, y, rx, ry, start_angle, sweep_angle);
        arc
    }

    /// Initialize the arc with center, radii, and angle parameters.
    ///
    /// `start_angle` is normalized into `[0, 2π)` and `sweep_angle` clamped
    /// to `±2π`. A sweep below `1e-10` in magnitude yields a single straight
    /// segment between the start and end points.
    pub fn init(&mut self, x: f64, y: f64, rx: f64, ry: f64, start_angle: f64, sweep_angle: f64) {
        let mut start_angle = normalize_angle(start_angle);
        let sweep_angle = if sweep_angle.abs() > 2.0 * PI {
            trace!("bezier arc: clamping sweep angle {} to a full turn", sweep_angle);
            sweep_angle.clamp(-2.0 * PI, 2.0 * PI)
        } else {
            sweep_angle
        };

        if sweep_angle.abs() < BEZIER_ARC_MIN_SWEEP {
            self.num_vertices = 4;
            self.cmd = PATH_CMD_LINE_TO;
            self.vertices[0] = x + rx * start_angle.cos();
            self.vertices[1] = y + ry * start_angle.sin();
            self.vertices[2] = x + rx * (start_angle + sweep_angle).cos();
            self.vertices[3] = y + ry * (start_angle + sweep_angle).sin();
            return;
        }

        let mut total_sweep = 0.0;
        let mut local_sweep;
        self.num_vertices = 2;
        self.cmd = PATH_CMD_CURVE4;
        let mut done = false;

        loop {
            let prev_sweep = total_sweep;
            if sweep_angle < 0.0 {
                local_sweep = -PI * 0.5;
                total_sweep -= PI * 0.5;
                if total_sweep <= sweep_angle + BEZIER_ARC_ANGLE_EPSILON {
                    local_sweep = sweep_angle - prev_sweep;
                    done = true;
                }
            } else {
                local_sweep = PI * 0.5;
                total_sweep += PI * 0.5;
                if total_sweep >= sweep_angle - BEZIER_ARC_ANGLE_EPSILON {
                    local_sweep = sweep_angle - prev_sweep;
                    done = true;
                }
            }

            let n = self.num_vertices;
            arc_to_bezier(
                x,
                y,
                rx,
                ry,
                start_angle,
                local_sweep,
                &mut self.vertices[n - 2..n + 6],
            );

            self.num_vertices += 6;
            start_angle += local_sweep;

            if done || self.num_vertices >= BEZIER_ARC_MAX_VALUES {
                break;
            }
        }
    }

    /// Replace the arc by a straight segment from `(x1, y1)` to `(x2, y2)`.
    fn init_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.num_vertices = 4;
        self.cmd = PATH_CMD_LINE_TO;
        self.vertices[..4].copy_from_slice(&[x1, y1, x2, y2]);
    }

    /// Number of coordinate values (doubled number of vertices).
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// The generated coordinates: `[x0, y0, x1, y1, ...]`.
    pub fn vertices(&self) -> &[f64] {
        &self.vertices[..self.num_vertices]
    }

    fn vertices_mut(&mut self) -> &mut [f64] {
        &mut self.vertices[..self.num_vertices]
    }
}

impl Default for BezierArc {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexSource for BezierArc {
    fn rewind(&mut self, _path_id: u32) {
        self.vertex = 0;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        if self.vertex >= self.num_vertices {
            return PATH_CMD_STOP;
        }
        *x = self.vertices[self.vertex];
        *y = self.vertices[self.vertex + 1];
        self.vertex += 2;
        if self.vertex == 2 {
            PATH_CMD_MOVE_TO
        } else {
            self.cmd
        }
    }
}

/// SVG-style bezier arc generator.
///
/// Computes an elliptical arc from `(x0, y0)` to `(x2, y2)` using SVG
/// endpoint parameterization (radii, rotation, flags), following the
/// conversion in SVG 1.1 Appendix F.6. The first and last generated vertices
/// are exactly the requested endpoints.
///
/// Radii too small to span the endpoints are scaled up. When the scaling is
/// extreme, [`radii_ok`](Self::radii_ok) reports `false` and the caller
/// decides whether to keep the arc.
///
/// Port of C++ `agg::bezier_arc_svg`.
#[derive(Debug, Clone)]
pub struct BezierArcSvg {
    arc: BezierArc,
    radii_ok: bool,
    radii_scale: f64,
}

impl BezierArcSvg {
    /// Create an uninitialized SVG bezier arc.
    pub fn new() -> Self {
        Self {
            arc: BezierArc::new(),
            radii_ok: false,
            radii_scale: 1.0,
        }
    }

    /// Create and initialize an SVG bezier arc.
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_params(
        x0: f64,
        y0: f64,
        rx: f64,
        ry: f64,
        angle: f64,
        large_arc_flag: bool,
        sweep_flag: bool,
        x2: f64,
        y2: f64,
    ) -> Self {
        let mut svg = Self::new();
        svg.init(x0, y0, rx, ry, angle, large_arc_flag, sweep_flag, x2, y2);
        svg
    }

    /// Initialize with SVG arc parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn init(
        &mut self,
        x0: f64,
        y0: f64,
        rx: f64,
        ry: f64,
        angle: f64,
        large_arc_flag: bool,
        sweep_flag: bool,
        x2: f64,
        y2: f64,
    ) {
        self.radii_ok = true;
        self.radii_scale = 1.0;

        let mut rx = rx.abs();
        let mut ry = ry.abs();

        // Zero radii or coincident endpoints: a straight segment (F.6.2)
        if rx < SVG_ARC_EPSILON
            || ry < SVG_ARC_EPSILON
            || calc_distance(x0, y0, x2, y2) < SVG_ARC_EPSILON
        {
            debug!(
                "svg arc: degenerate arc ({}, {}) -> ({}, {}) with radii ({}, {}), using a line",
                x0, y0, x2, y2, rx, ry
            );
            self.arc.init_line(x0, y0, x2, y2);
            return;
        }

        // Half of the chord, in the ellipse's own frame
        let dx2 = (x0 - x2) / 2.0;
        let dy2 = (y0 - y2) / 2.0;

        let (sin_a, cos_a) = angle.sin_cos();

        let x1 = cos_a * dx2 + sin_a * dy2;
        let y1 = -sin_a * dx2 + cos_a * dy2;

        // Ensure radii are large enough
        let mut prx = rx * rx;
        let mut pry = ry * ry;
        let px1 = x1 * x1;
        let py1 = y1 * y1;

        let radii_check = px1 / prx + py1 / pry;
        if radii_check > 1.0 {
            self.radii_scale = radii_check.sqrt();
            rx *= self.radii_scale;
            ry *= self.radii_scale;
            prx = rx * rx;
            pry = ry * ry;
            trace!("svg arc: radii scaled by {}", self.radii_scale);
            if radii_check > SVG_ARC_RADII_LIMIT {
                debug!(
                    "svg arc: radii check {} exceeds {}, arc is degraded",
                    radii_check, SVG_ARC_RADII_LIMIT
                );
                self.radii_ok = false;
            }
        }

        // Center in the rotated frame
        let sign = if large_arc_flag == sweep_flag {
            -1.0
        } else {
            1.0
        };
        let sq = (prx * pry - prx * py1 - pry * px1) / (prx * py1 + pry * px1);
        let coef = sign * sq.max(0.0).sqrt();
        let cx1 = coef * ((rx * y1) / ry);
        let cy1 = coef * -((ry * x1) / rx);

        // Center in user space
        let sx2 = (x0 + x2) / 2.0;
        let sy2 = (y0 + y2) / 2.0;
        let cx = sx2 + (cos_a * cx1 - sin_a * cy1);
        let cy = sy2 + (sin_a * cx1 + cos_a * cy1);

        let ux = (x1 - cx1) / rx;
        let uy = (y1 - cy1) / ry;
        let vx = (-x1 - cx1) / rx;
        let vy = (-y1 - cy1) / ry;

        // Start angle: (1, 0) -> u
        let n = (ux * ux + uy * uy).sqrt();
        let p = ux;
        let sign = if uy < 0.0 { -1.0 } else { 1.0 };
        let v = (p / n).clamp(-1.0, 1.0);
        let start_angle = sign * v.acos();

        // Sweep angle: u -> v
        let n = ((ux * ux + uy * uy) * (vx * vx + vy * vy)).sqrt();
        let p = ux * vx + uy * vy;
        let sign = if ux * vy - uy * vx < 0.0 { -1.0 } else { 1.0 };
        let v = (p / n).clamp(-1.0, 1.0);
        let mut sweep_angle = sign * v.acos();

        if !sweep_flag && sweep_angle > 0.0 {
            sweep_angle -= PI * 2.0;
        } else if sweep_flag && sweep_angle < 0.0 {
            sweep_angle += PI * 2.0;
        }

        self.arc.init(0.0, 0.0, rx, ry, start_angle, sweep_angle);

        let mtx = TransAffine::rotation(angle) * TransAffine::translation(cx, cy);
        let verts = self.arc.vertices_mut();
        mtx.apply_to_coords(verts);

        // Exact endpoints, free of trigonometric drift
        let nv = verts.len();
        verts[0] = x0;
        verts[1] = y0;
        verts[nv - 2] = x2;
        verts[nv - 1] = y2;
    }

    /// `false` if the radii had to be enlarged by more than the feasibility
    /// limit to connect the endpoints.
    pub fn radii_ok(&self) -> bool {
        self.radii_ok
    }

    /// Factor the radii were multiplied by to reach the endpoints
    /// (`1.0` when no scaling was needed).
    pub fn radii_scale(&self) -> f64 {
        self.radii_scale
    }

    /// Number of coordinate values (doubled number of vertices).
    pub fn num_vertices(&self) -> usize {
        self.arc.num_vertices()
    }

    /// The generated coordinates: `[x0, y0, x1, y1, ...]`.
    pub fn vertices(&self) -> &[f64] {
        self.arc.vertices()
    }
}

impl Default for BezierArcSvg {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexSource for BezierArcSvg {
    fn rewind(&mut self, _path_id: u32) {
        self.arc.rewind(0);
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        self.arc.vertex(x, y)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::{is_stop, vertices, VertexD};

    #[test]
    fn test_bezier_arc_quarter() {
        let mut arc = BezierArc::new_with_params(0.0, 0.0, 10.0, 10.0, 0.0, PI / 2.0);
        arc.rewind(0);
        let mut x = 0.0;
        let mut y = 0.0;

        let cmd = arc.vertex(&mut x, &mut y);
        assert_eq!(cmd, PATH_CMD_MOVE_TO);
        assert!((x - 10.0).abs() < 1e-6);
        assert!(y.abs() < 1e-6);

        for _ in 0..3 {
            let cmd = arc.vertex(&mut x, &mut y);
            assert_eq!(cmd, PATH_CMD_CURVE4);
        }
        assert!(x.abs() < 1e-6);
        assert!((y - 10.0).abs() < 1e-6);

        let cmd = arc.vertex(&mut x, &mut y);
        assert!(is_stop(cmd));
    }

    #[test]
    fn test_bezier_arc_vertex_counts() {
        let count = |sweep: f64| {
            BezierArc::new_with_params(0.0, 0.0, 10.0, 10.0, 0.0, sweep).num_vertices()
        };
        assert_eq!(count(PI / 2.0), 8);
        assert_eq!(count(-PI / 2.0), 8);
        assert_eq!(count(PI), 14);
        assert_eq!(count(3.0 * PI / 2.0), 20);
        assert_eq!(count(2.0 * PI), 26);
    }

    #[test]
    fn test_bezier_arc_sweep_clamped() {
        let arc = BezierArc::new_with_params(0.0, 0.0, 1.0, 1.0, 0.0, 7.0 * PI);
        assert_eq!(arc.num_vertices(), BEZIER_ARC_MAX_VALUES);
        let v = arc.vertices();
        assert!((v[24] - 1.0).abs() < 1e-9);
        assert!(v[25].abs() < 1e-9);
    }

    #[test]
    fn test_bezier_arc_finishing_epsilon() {
        // Just past a quarter turn: folded into the first curve
        let arc = BezierArc::new_with_params(0.0, 0.0, 1.0, 1.0, 0.0, PI / 2.0 + 0.005);
        assert_eq!(arc.num_vertices(), 8);
        // Far enough past it: a second, short curve
        let arc = BezierArc::new_with_params(0.0, 0.0, 1.0, 1.0, 0.0, PI / 2.0 + 0.05);
        assert_eq!(arc.num_vertices(), 14);
        let v = arc.vertices();
        let end = PI / 2.0 + 0.05;
        assert!((v[12] - end.cos()).abs() < 1e-12);
        assert!((v[13] - end.sin()).abs() < 1e-12);
    }

    #[test]
    fn test_bezier_arc_tiny_sweep() {
        let arc = BezierArc::new_with_params(0.0, 0.0, 10.0, 10.0, 0.0, 1e-15);
        assert_eq!(arc.num_vertices(), 4);
        assert_eq!(arc.cmd, PATH_CMD_LINE_TO);
    }

    #[test]
    fn test_bezier_arc_start_angle_normalized() {
        let a = BezierArc::new_with_params(0.0, 0.0, 2.0, 1.0, 0.25, 1.0);
        let b = BezierArc::new_with_params(0.0, 0.0, 2.0, 1.0, 0.25 + 4.0 * PI, 1.0);
        for (p, q) in a.vertices().iter().zip(b.vertices()) {
            assert!((p - q).abs() < 1e-9);
        }
    }

    #[test]
    fn test_normalize_angle_stays_below_full_turn() {
        assert_eq!(normalize_angle(-1e-18), 0.0);
        assert_eq!(normalize_angle(2.0 * PI), 0.0);
        assert_eq!(normalize_angle(0.5), 0.5);
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        for a in [-1e-300, -f64::EPSILON, -7.0 * PI, 1e6] {
            let n = normalize_angle(a);
            assert!((0.0..2.0 * PI).contains(&n), "{} -> {}", a, n);
        }
    }

    #[test]
    fn test_bezier_arc_ellipse_radii_and_center() {
        let arc = BezierArc::new_with_params(5.0, -3.0, 4.0, 2.0, 0.0, PI);
        let v = arc.vertices();
        assert!((v[0] - 9.0).abs() < 1e-12);
        assert!((v[1] + 3.0).abs() < 1e-12);
        // Quarter point lands on the minor axis
        assert!((v[6] - 5.0).abs() < 1e-12);
        assert!((v[7] + 1.0).abs() < 1e-12);
        assert!((v[12] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bezier_arc_default_is_empty() {
        let mut arc = BezierArc::new();
        assert_eq!(arc.num_vertices(), 0);
        assert!(arc.vertices().is_empty());
        let (mut x, mut y) = (0.0, 0.0);
        assert!(is_stop(arc.vertex(&mut x, &mut y)));
        arc.rewind(0);
        assert!(is_stop(arc.vertex(&mut x, &mut y)));
    }

    #[test]
    fn test_bezier_arc_rewind_replays() {
        let mut arc = BezierArc::new_with_params(1.0, 2.0, 3.0, 4.0, 0.5, -2.5);
        let first: Vec<VertexD> = vertices(&mut arc).collect();
        let second: Vec<VertexD> = vertices(&mut arc).collect();
        assert_eq!(first.len(), arc.num_vertices() / 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_arc_to_bezier_endpoints() {
        let mut curve = [0.0; 8];
        arc_to_bezier(0.0, 0.0, 10.0, 10.0, 0.0, PI / 2.0, &mut curve);

        assert!((curve[0] - 10.0).abs() < 1e-6);
        assert!(curve[1].abs() < 1e-6);
        assert!(curve[6].abs() < 1e-6);
        assert!((curve[7] - 10.0).abs() < 1e-6);

        // Standard quarter-circle handle length 4/3 * tan(pi/8) * r
        let k = 4.0 / 3.0 * (PI / 8.0).tan() * 10.0;
        assert!((curve[2] - 10.0).abs() < 1e-9);
        assert!((curve[3] - k).abs() < 1e-9);
    }

    #[test]
    fn test_bezier_arc_svg_basic() {
        let mut svg = BezierArcSvg::new_with_params(
            0.0, 10.0, // start
            10.0, 10.0, // radii
            0.0,  // angle
            false, true, // flags
            10.0, 0.0, // end
        );
        assert!(svg.radii_ok());
        assert_eq!(svg.radii_scale(), 1.0);

        let verts: Vec<VertexD> = vertices(&mut svg).collect();
        assert!(verts.len() >= 4);
        assert_eq!(verts[0], VertexD::new(0.0, 10.0, PATH_CMD_MOVE_TO));
        let last = verts[verts.len() - 1];
        assert_eq!((last.x, last.y), (10.0, 0.0));
        assert!(verts[1..].iter().all(|v| v.cmd == PATH_CMD_CURVE4));
    }

    #[test]
    fn test_bezier_arc_svg_large_arc_stays_on_circle() {
        // Same endpoints and center (10, 10) as above, but the other three
        // quarters of the circle
        let svg = BezierArcSvg::new_with_params(0.0, 10.0, 10.0, 10.0, 0.0, true, false, 10.0, 0.0);
        assert_eq!(svg.num_vertices(), 20);
        let v = svg.vertices();
        for i in (0..v.len()).step_by(6) {
            let r = ((v[i] - 10.0).powi(2) + (v[i + 1] - 10.0).powi(2)).sqrt();
            assert!((r - 10.0).abs() < 1e-9, "r = {}", r);
        }
    }

    #[test]
    fn test_bezier_arc_svg_rotated_ellipse() {
        let angle = PI / 6.0;
        let svg = BezierArcSvg::new_with_params(1.0, 2.0, 8.0, 3.0, angle, false, false, 6.0, -1.0);
        assert!(svg.radii_ok());
        let v = svg.vertices();
        let nv = svg.num_vertices();
        assert_eq!((v[0], v[1]), (1.0, 2.0));
        assert_eq!((v[nv - 2], v[nv - 1]), (6.0, -1.0));
    }

    #[test]
    fn test_bezier_arc_svg_negative_radii_use_magnitude() {
        let a = BezierArcSvg::new_with_params(0.0, 0.0, 5.0, 3.0, 0.2, false, true, 4.0, 4.0);
        let b = BezierArcSvg::new_with_params(0.0, 0.0, -5.0, -3.0, 0.2, false, true, 4.0, 4.0);
        assert_eq!(a.vertices(), b.vertices());
    }

    #[test]
    fn test_bezier_arc_svg_small_radii() {
        let svg = BezierArcSvg::new_with_params(
            0.0, 0.0, // start
            1.0, 1.0, // tiny radii
            0.0, // angle
            false, true, // flags
            100.0, 100.0, // end far away
        );
        assert!(!svg.radii_ok());
        assert!(svg.radii_scale() > 10.0);
    }

    #[test]
    fn test_bezier_arc_svg_mild_scaling_is_ok() {
        // Chord of 10 with radius 4: scaled to 5 (check = 1.5625)
        let svg = BezierArcSvg::new_with_params(0.0, 0.0, 4.0, 4.0, 0.0, false, true, 10.0, 0.0);
        assert!(svg.radii_ok());
        assert!((svg.radii_scale() - 1.25).abs() < 1e-12);
        // Exactly a half circle
        assert_eq!(svg.num_vertices(), 14);
    }

    #[test]
    fn test_bezier_arc_svg_degenerate_becomes_line() {
        let mut svg = BezierArcSvg::new_with_params(1.0, 1.0, 0.0, 5.0, 0.0, false, true, 4.0, 5.0);
        assert!(svg.radii_ok());
        let verts: Vec<VertexD> = vertices(&mut svg).collect();
        assert_eq!(
            verts,
            vec![
                VertexD::new(1.0, 1.0, PATH_CMD_MOVE_TO),
                VertexD::new(4.0, 5.0, PATH_CMD_LINE_TO),
            ]
        );

        let svg = BezierArcSvg::new_with_params(2.0, 2.0, 5.0, 5.0, 0.0, true, true, 2.0, 2.0);
        assert_eq!(svg.vertices(), &[2.0, 2.0, 2.0, 2.0]);
    }
}
