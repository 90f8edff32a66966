//! Dash vertex generator.
//!
//! Port of `agg_vcgen_dash.h` / `agg_vcgen_dash.cpp`. Generates
//! dashed lines from a continuous center-line path.

use log::debug;

use crate::array::{shorten_path, VertexDist, VertexSequence};
use crate::basics::{
    get_close_flag, is_move_to, is_vertex, PATH_CMD_LINE_TO, PATH_CMD_MOVE_TO, PATH_CMD_STOP,
};
use crate::conv_adaptor_vcgen::VcgenGenerator;
use crate::dash_pattern::{DashPattern, MAX_DASH_PAIRS};

/// Capacity of the dash array: one dash and one gap per pair.
const MAX_DASHES: usize = MAX_DASH_PAIRS * 2;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Initial,
    Ready,
    Polyline,
    Stop,
}

/// Dash vertex generator.
///
/// Holds a cyclic pattern of up to 32 dash/gap pairs and re-emits the
/// accumulated polyline as `move_to`/`line_to` runs: `line_to` ends a
/// drawn dash, `move_to` ends a gap.
///
/// The pattern phase is given by [`dash_start`](Self::dash_start) and is
/// re-applied at the beginning of every traversal, so rewinding twice
/// replays the same output. A negative start uses its magnitude.
///
/// Port of C++ `vcgen_dash`.
#[derive(Debug, Clone)]
pub struct VcgenDash {
    dashes: [f64; MAX_DASHES],
    total_dash_len: f64,
    num_dashes: usize,
    dash_start: f64,
    shorten: f64,
    curr_dash_start: f64,
    curr_dash: usize,
    curr_rest: f64,
    v1: usize,
    v2: usize,
    src_vertices: VertexSequence,
    closed: bool,
    status: Status,
    src_vertex: usize,
}

impl VcgenDash {
    pub fn new() -> Self {
        Self {
            dashes: [0.0; MAX_DASHES],
            total_dash_len: 0.0,
            num_dashes: 0,
            dash_start: 0.0,
            shorten: 0.0,
            curr_dash_start: 0.0,
            curr_dash: 0,
            curr_rest: 0.0,
            v1: 0,
            v2: 0,
            src_vertices: VertexSequence::new(),
            closed: false,
            status: Status::Initial,
            src_vertex: 0,
        }
    }

    pub fn remove_all_dashes(&mut self) {
        self.total_dash_len = 0.0;
        self.num_dashes = 0;
        self.curr_dash_start = 0.0;
        self.curr_dash = 0;
    }

    /// Append a dash/gap pair. Pairs beyond the 32nd are ignored.
    pub fn add_dash(&mut self, dash_len: f64, gap_len: f64) {
        if self.num_dashes < MAX_DASHES {
            self.total_dash_len += dash_len + gap_len;
            self.dashes[self.num_dashes] = dash_len;
            self.dashes[self.num_dashes + 1] = gap_len;
            self.num_dashes += 2;
        } else {
            debug!(
                "vcgen_dash: pattern full ({} pairs), dropping dash {} / gap {}",
                MAX_DASH_PAIRS, dash_len, gap_len
            );
        }
    }

    /// Replace the dash array with `pattern`.
    pub fn set_pattern(&mut self, pattern: &DashPattern) {
        self.remove_all_dashes();
        for &(dash_len, gap_len) in pattern.pairs() {
            self.add_dash(dash_len, gap_len);
        }
    }

    /// Number of stored dash and gap entries (twice the number of pairs).
    pub fn num_dashes(&self) -> usize {
        self.num_dashes
    }

    /// Length of one period of the pattern.
    pub fn total_dash_len(&self) -> f64 {
        self.total_dash_len
    }

    /// Set the pattern phase, the distance into the pattern at which
    /// traversal begins.
    pub fn dash_start(&mut self, ds: f64) {
        self.dash_start = ds;
        self.calc_dash_start(ds.abs());
    }

    fn calc_dash_start(&mut self, ds: f64) {
        self.curr_dash = 0;
        self.curr_dash_start = 0.0;
        if self.num_dashes == 0 || self.total_dash_len <= 0.0 {
            return;
        }
        // Skip whole periods but keep the remainder in (0, total], so an
        // exact multiple ends on the last entry like the full walk does
        let total = self.total_dash_len;
        let mut ds = if ds > total {
            ds - ((ds / total).ceil() - 1.0) * total
        } else {
            ds
        };
        while ds > 0.0 {
            if ds > self.dashes[self.curr_dash] {
                ds -= self.dashes[self.curr_dash];
                self.curr_dash += 1;
                self.curr_dash_start = 0.0;
                if self.curr_dash >= self.num_dashes {
                    self.curr_dash = 0;
                }
            } else {
                self.curr_dash_start = ds;
                ds = 0.0;
            }
        }
    }

    pub fn set_shorten(&mut self, s: f64) {
        self.shorten = s;
    }

    pub fn shorten(&self) -> f64 {
        self.shorten
    }

    // Vertex Generator Interface
    pub fn remove_all(&mut self) {
        self.status = Status::Initial;
        self.src_vertices.remove_all();
        self.closed = false;
    }

    /// Feed one source vertex. `move_to` replaces the pending start point,
    /// other vertex commands extend the polyline, and anything else (an
    /// `end_poly`) records whether the polyline is closed.
    pub fn add_vertex(&mut self, x: f64, y: f64, cmd: u32) {
        self.status = Status::Initial;
        if is_move_to(cmd) {
            self.src_vertices.modify_last(VertexDist::new(x, y));
        } else if is_vertex(cmd) {
            self.src_vertices.add(VertexDist::new(x, y));
        } else {
            self.closed = get_close_flag(cmd) != 0;
        }
    }

    // Vertex Source Interface
    pub fn rewind(&mut self, _path_id: u32) {
        if self.status == Status::Initial {
            self.src_vertices.close(self.closed);
            shorten_path(&mut self.src_vertices, self.shorten, self.closed);
        }
        self.status = Status::Ready;
        self.src_vertex = 0;
    }

    /// Next output vertex. Gives `stop` until [`rewind`](Self::rewind) has
    /// been called for the current input.
    pub fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        match self.status {
            Status::Initial | Status::Stop => PATH_CMD_STOP,
            Status::Ready => {
                if self.num_dashes < 2 || self.src_vertices.size() < 2 {
                    return PATH_CMD_STOP;
                }
                if self.total_dash_len <= 0.0 {
                    debug!("vcgen_dash: pattern has zero length, nothing to emit");
                    return PATH_CMD_STOP;
                }
                self.status = Status::Polyline;
                self.src_vertex = 1;
                self.v1 = 0;
                self.v2 = 1;
                self.curr_rest = self.src_vertices[0].dist;
                *x = self.src_vertices[0].x;
                *y = self.src_vertices[0].y;
                self.calc_dash_start(self.dash_start.abs());
                PATH_CMD_MOVE_TO
            }
            Status::Polyline => self.polyline_vertex(x, y),
        }
    }

    /// One step along the current source segment `v1 -> v2`.
    fn polyline_vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        let dash_rest = self.dashes[self.curr_dash] - self.curr_dash_start;

        // Odd entries are gaps: reaching their end only moves the pen
        let cmd = if (self.curr_dash & 1) != 0 {
            PATH_CMD_MOVE_TO
        } else {
            PATH_CMD_LINE_TO
        };

        let v1 = self.src_vertices[self.v1];
        let v2 = self.src_vertices[self.v2];

        if self.curr_rest > dash_rest {
            self.curr_rest -= dash_rest;
            self.curr_dash += 1;
            if self.curr_dash >= self.num_dashes {
                self.curr_dash = 0;
            }
            self.curr_dash_start = 0.0;
            *x = v2.x - (v2.x - v1.x) * self.curr_rest / v1.dist;
            *y = v2.y - (v2.y - v1.y) * self.curr_rest / v1.dist;
        } else {
            self.curr_dash_start += self.curr_rest;
            *x = v2.x;
            *y = v2.y;
            self.src_vertex += 1;
            self.v1 = self.v2;
            self.curr_rest = self.src_vertices[self.v1].dist;
            let size = self.src_vertices.size();
            if self.closed {
                if self.src_vertex > size {
                    self.status = Status::Stop;
                } else {
                    self.v2 = if self.src_vertex >= size {
                        0
                    } else {
                        self.src_vertex
                    };
                }
            } else if self.src_vertex >= size {
                self.status = Status::Stop;
            } else {
                self.v2 = self.src_vertex;
            }
        }
        cmd
    }
}

impl Default for VcgenDash {
    fn default() -> Self {
        Self::new()
    }
}

impl VcgenGenerator for VcgenDash {
    fn remove_all(&mut self) {
        self.remove_all();
    }
    fn add_vertex(&mut self, x: f64, y: f64, cmd: u32) {
        self.add_vertex(x, y, cmd);
    }
    fn rewind(&mut self, path_id: u32) {
        self.rewind(path_id);
    }
    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        self.vertex(x, y)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::{is_stop, PATH_CMD_END_POLY, PATH_FLAGS_CLOSE};

    fn collect_gen_vertices(gen: &mut VcgenDash) -> Vec<(f64, f64, u32)> {
        gen.rewind(0);
        let mut result = Vec::new();
        loop {
            let (mut x, mut y) = (0.0, 0.0);
            let cmd = gen.vertex(&mut x, &mut y);
            if is_stop(cmd) {
                break;
            }
            result.push((x, y, cmd));
        }
        result
    }

    fn horizontal(gen: &mut VcgenDash, len: f64) {
        gen.add_vertex(0.0, 0.0, PATH_CMD_MOVE_TO);
        gen.add_vertex(len, 0.0, PATH_CMD_LINE_TO);
    }

    /// Sum of the lengths of all drawn (`line_to`) runs.
    fn drawn_length(verts: &[(f64, f64, u32)]) -> f64 {
        verts
            .windows(2)
            .filter(|w| w[1].2 == PATH_CMD_LINE_TO)
            .map(|w| ((w[1].0 - w[0].0).powi(2) + (w[1].1 - w[0].1).powi(2)).sqrt())
            .sum()
    }

    #[test]
    fn test_new_defaults() {
        let gen = VcgenDash::new();
        assert_eq!(gen.shorten(), 0.0);
        assert_eq!(gen.num_dashes(), 0);
        assert_eq!(gen.total_dash_len(), 0.0);
    }

    #[test]
    fn test_empty_produces_stop() {
        let mut gen = VcgenDash::new();
        gen.add_dash(10.0, 5.0);
        assert!(collect_gen_vertices(&mut gen).is_empty());
    }

    #[test]
    fn test_single_point_produces_stop() {
        let mut gen = VcgenDash::new();
        gen.add_dash(10.0, 5.0);
        gen.add_vertex(3.0, 3.0, PATH_CMD_MOVE_TO);
        assert!(collect_gen_vertices(&mut gen).is_empty());
    }

    #[test]
    fn test_no_dashes_produces_stop() {
        let mut gen = VcgenDash::new();
        horizontal(&mut gen, 100.0);
        assert!(collect_gen_vertices(&mut gen).is_empty());
    }

    #[test]
    fn test_zero_length_pattern_produces_stop() {
        let mut gen = VcgenDash::new();
        gen.add_dash(0.0, 0.0);
        gen.dash_start(3.0);
        horizontal(&mut gen, 10.0);
        assert!(collect_gen_vertices(&mut gen).is_empty());
    }

    #[test]
    fn test_vertex_without_rewind_stops() {
        let mut gen = VcgenDash::new();
        gen.add_dash(3.0, 2.0);
        horizontal(&mut gen, 10.0);
        let (mut x, mut y) = (1.0, 1.0);
        assert_eq!(gen.vertex(&mut x, &mut y), PATH_CMD_STOP);
        assert_eq!((x, y), (1.0, 1.0));

        gen.rewind(0);
        assert_eq!(gen.vertex(&mut x, &mut y), PATH_CMD_MOVE_TO);
        assert_eq!((x, y), (0.0, 0.0));

        // Adding a vertex invalidates the traversal until the next rewind
        gen.add_vertex(12.0, 0.0, PATH_CMD_LINE_TO);
        assert_eq!(gen.vertex(&mut x, &mut y), PATH_CMD_STOP);
    }

    #[test]
    fn test_dash_parity_on_straight_segment() {
        let mut gen = VcgenDash::new();
        gen.add_dash(3.0, 2.0);
        horizontal(&mut gen, 10.0);

        let verts = collect_gen_vertices(&mut gen);
        assert_eq!(
            verts,
            vec![
                (0.0, 0.0, PATH_CMD_MOVE_TO),
                (3.0, 0.0, PATH_CMD_LINE_TO),
                (5.0, 0.0, PATH_CMD_MOVE_TO),
                (8.0, 0.0, PATH_CMD_LINE_TO),
                (10.0, 0.0, PATH_CMD_MOVE_TO),
            ]
        );
        assert!((drawn_length(&verts) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_dash_ends_inside_dash() {
        let mut gen = VcgenDash::new();
        gen.add_dash(4.0, 2.0);
        horizontal(&mut gen, 9.0);
        let verts = collect_gen_vertices(&mut gen);
        // Second dash is cut by the end of the path
        assert_eq!(verts.last(), Some(&(9.0, 0.0, PATH_CMD_LINE_TO)));
        assert!((drawn_length(&verts) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_dash_capacity() {
        let mut gen = VcgenDash::new();
        for _ in 0..40 {
            gen.add_dash(1.0, 1.0);
        }
        assert_eq!(gen.num_dashes(), 64);
        assert_eq!(gen.total_dash_len(), 64.0);
    }

    #[test]
    fn test_dash_across_polyline_corner() {
        let mut gen = VcgenDash::new();
        gen.add_dash(3.0, 1.0);
        gen.add_vertex(0.0, 0.0, PATH_CMD_MOVE_TO);
        gen.add_vertex(2.0, 0.0, PATH_CMD_LINE_TO);
        gen.add_vertex(2.0, 4.0, PATH_CMD_LINE_TO);

        let verts = collect_gen_vertices(&mut gen);
        assert_eq!(
            verts,
            vec![
                (0.0, 0.0, PATH_CMD_MOVE_TO),
                (2.0, 0.0, PATH_CMD_LINE_TO),
                (2.0, 1.0, PATH_CMD_LINE_TO),
                (2.0, 2.0, PATH_CMD_MOVE_TO),
                (2.0, 4.0, PATH_CMD_LINE_TO),
            ]
        );
    }

    #[test]
    fn test_dash_on_closed_square() {
        let mut gen = VcgenDash::new();
        gen.add_dash(1.0, 1.0);
        gen.add_vertex(0.0, 0.0, PATH_CMD_MOVE_TO);
        gen.add_vertex(2.0, 0.0, PATH_CMD_LINE_TO);
        gen.add_vertex(2.0, 2.0, PATH_CMD_LINE_TO);
        gen.add_vertex(0.0, 2.0, PATH_CMD_LINE_TO);
        gen.add_vertex(0.0, 0.0, PATH_CMD_END_POLY | PATH_FLAGS_CLOSE);

        let verts = collect_gen_vertices(&mut gen);
        let draws: Vec<_> = verts
            .iter()
            .filter(|v| v.2 == PATH_CMD_LINE_TO)
            .map(|v| (v.0, v.1))
            .collect();
        assert_eq!(draws, vec![(1.0, 0.0), (2.0, 1.0), (1.0, 2.0), (0.0, 1.0)]);
        // Ends on the seam, not past it
        assert_eq!(verts.last(), Some(&(0.0, 0.0, PATH_CMD_MOVE_TO)));
        assert!((drawn_length(&verts) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_closing_vertex_coincident_with_start() {
        let mut gen = VcgenDash::new();
        gen.add_dash(1.0, 1.0);
        gen.add_vertex(0.0, 0.0, PATH_CMD_MOVE_TO);
        gen.add_vertex(2.0, 0.0, PATH_CMD_LINE_TO);
        gen.add_vertex(2.0, 2.0, PATH_CMD_LINE_TO);
        gen.add_vertex(0.0, 2.0, PATH_CMD_LINE_TO);
        gen.add_vertex(0.0, 0.0, PATH_CMD_LINE_TO);
        gen.add_vertex(0.0, 0.0, PATH_CMD_END_POLY | PATH_FLAGS_CLOSE);

        let verts = collect_gen_vertices(&mut gen);
        let draws = verts.iter().filter(|v| v.2 == PATH_CMD_LINE_TO).count();
        assert_eq!(draws, 4);
    }

    #[test]
    fn test_dash_rewind_replay() {
        let mut gen = VcgenDash::new();
        gen.add_dash(15.0, 5.0);
        gen.dash_start(7.0);
        horizontal(&mut gen, 100.0);

        let v1 = collect_gen_vertices(&mut gen);
        let v2 = collect_gen_vertices(&mut gen);
        assert_eq!(v1, v2);
    }

    #[test]
    fn test_remove_all() {
        let mut gen = VcgenDash::new();
        gen.add_dash(10.0, 5.0);
        horizontal(&mut gen, 100.0);
        gen.remove_all();
        assert!(collect_gen_vertices(&mut gen).is_empty());
    }

    #[test]
    fn test_remove_all_dashes() {
        let mut gen = VcgenDash::new();
        gen.add_dash(10.0, 5.0);
        gen.remove_all_dashes();
        horizontal(&mut gen, 100.0);
        assert!(collect_gen_vertices(&mut gen).is_empty());
    }

    #[test]
    fn test_dash_start_offset() {
        let mut gen = VcgenDash::new();
        gen.add_dash(3.0, 2.0);
        gen.dash_start(4.0);
        horizontal(&mut gen, 10.0);
        // Phase 4 lands one unit into the gap
        let verts = collect_gen_vertices(&mut gen);
        assert_eq!(
            verts,
            vec![
                (0.0, 0.0, PATH_CMD_MOVE_TO),
                (1.0, 0.0, PATH_CMD_MOVE_TO),
                (4.0, 0.0, PATH_CMD_LINE_TO),
                (6.0, 0.0, PATH_CMD_MOVE_TO),
                (9.0, 0.0, PATH_CMD_LINE_TO),
                (10.0, 0.0, PATH_CMD_MOVE_TO),
            ]
        );
    }

    #[test]
    fn test_dash_start_wraps_whole_periods() {
        let mut a = VcgenDash::new();
        a.add_dash(3.0, 2.0);
        a.dash_start(1.0);
        horizontal(&mut a, 10.0);

        let mut b = VcgenDash::new();
        b.add_dash(3.0, 2.0);
        b.dash_start(21.0);
        horizontal(&mut b, 10.0);

        assert_eq!(collect_gen_vertices(&mut a), collect_gen_vertices(&mut b));
    }

    #[test]
    fn test_dash_start_exact_period_multiple() {
        let run = |ds: f64| {
            let mut gen = VcgenDash::new();
            gen.add_dash(3.0, 2.0);
            gen.dash_start(ds);
            horizontal(&mut gen, 10.0);
            collect_gen_vertices(&mut gen)
        };
        let one_period = run(5.0);
        // Phase 5 ends exactly on the gap, so the first step is a zero
        // length move
        assert_eq!(one_period[1], (0.0, 0.0, PATH_CMD_MOVE_TO));
        assert_eq!(one_period[2], (3.0, 0.0, PATH_CMD_LINE_TO));
        assert_eq!(run(10.0), one_period);
        assert_eq!(run(50.0), one_period);
    }

    #[test]
    fn test_negative_dash_start_replays() {
        let mut gen = VcgenDash::new();
        gen.add_dash(3.0, 2.0);
        gen.dash_start(-1.0);
        horizontal(&mut gen, 4.0);

        let first = collect_gen_vertices(&mut gen);
        assert_eq!(
            first,
            vec![
                (0.0, 0.0, PATH_CMD_MOVE_TO),
                (2.0, 0.0, PATH_CMD_LINE_TO),
                (4.0, 0.0, PATH_CMD_MOVE_TO),
            ]
        );
        assert_eq!(collect_gen_vertices(&mut gen), first);

        let mut positive = VcgenDash::new();
        positive.add_dash(3.0, 2.0);
        positive.dash_start(1.0);
        horizontal(&mut positive, 4.0);
        assert_eq!(collect_gen_vertices(&mut positive), first);
    }

    #[test]
    fn test_shorten_trims_end() {
        let mut gen = VcgenDash::new();
        gen.add_dash(3.0, 2.0);
        gen.set_shorten(2.0);
        assert_eq!(gen.shorten(), 2.0);
        horizontal(&mut gen, 10.0);
        let verts = collect_gen_vertices(&mut gen);
        assert_eq!(verts.last(), Some(&(8.0, 0.0, PATH_CMD_LINE_TO)));
    }

    #[test]
    fn test_set_empty_pattern_produces_stop() {
        let mut gen = VcgenDash::new();
        gen.add_dash(3.0, 2.0);
        gen.set_pattern(&DashPattern::new());
        assert_eq!(gen.num_dashes(), 0);
        horizontal(&mut gen, 10.0);
        assert!(collect_gen_vertices(&mut gen).is_empty());
    }

    #[test]
    fn test_set_pattern() {
        let pattern = DashPattern::from_lengths(&[3.0, 2.0]).unwrap();
        let mut a = VcgenDash::new();
        a.add_dash(9.0, 9.0);
        a.set_pattern(&pattern);
        assert_eq!(a.num_dashes(), 2);
        horizontal(&mut a, 10.0);

        let mut b = VcgenDash::new();
        b.add_dash(3.0, 2.0);
        horizontal(&mut b, 10.0);
        assert_eq!(collect_gen_vertices(&mut a), collect_gen_vertices(&mut b));
    }

    #[test]
    fn test_diagonal_dash() {
        let mut gen = VcgenDash::new();
        gen.add_dash(10.0, 5.0);
        gen.add_vertex(0.0, 0.0, PATH_CMD_MOVE_TO);
        gen.add_vertex(100.0, 100.0, PATH_CMD_LINE_TO);

        let verts = collect_gen_vertices(&mut gen);
        assert!(!verts.is_empty());
        for v in &verts {
            assert!(
                (v.0 - v.1).abs() < 1e-10,
                "Point ({}, {}) should be on y=x diagonal",
                v.0,
                v.1
            );
        }
        let total = 100.0 * 2f64.sqrt();
        let periods = (total / 15.0).floor();
        let tail = (total - periods * 15.0).min(10.0);
        assert!((drawn_length(&verts) - (periods * 10.0 + tail)).abs() < 1e-9);
    }
}
