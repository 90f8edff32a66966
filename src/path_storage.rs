//! Path storage, the vertex container that feeds the generators.
//!
//! Port of the line and arc parts of `agg_path_storage.h`. Uses
//! `Vec<VertexD>` in place of the block-based `vertex_block_storage`.

use log::trace;

use crate::basics::{
    is_move_to, is_stop, is_vertex, path_vertices, VertexD, VertexSource, PATH_CMD_END_POLY,
    PATH_CMD_LINE_TO, PATH_CMD_MOVE_TO, PATH_CMD_STOP, PATH_FLAGS_CLOSE,
};
use crate::bezier_arc::{BezierArcSvg, SVG_ARC_EPSILON};
use crate::math::{calc_distance, VERTEX_DIST_EPSILON};

/// Path storage.
///
/// Stores an ordered sequence of vertices, each with an (x, y) coordinate
/// and a path command. Sub-paths are separated by `move_to` or `stop`
/// commands; `rewind(path_id)` starts iteration at vertex index `path_id`.
///
/// Port of C++ `agg::path_storage`.
#[derive(Debug, Clone, Default)]
pub struct PathStorage {
    vertices: Vec<VertexD>,
    iterator: usize,
}

impl PathStorage {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            iterator: 0,
        }
    }

    /// Remove all vertices (keeps allocated memory).
    pub fn remove_all(&mut self) {
        self.vertices.clear();
        self.iterator = 0;
    }

    // ---------------------------------------------------------------
    // Path construction
    // ---------------------------------------------------------------

    /// Begin a new sub-path. If the last command is not `stop`, a stop
    /// command is inserted first. Returns the path id of the new sub-path.
    pub fn start_new_path(&mut self) -> usize {
        if !is_stop(self.last_command()) {
            self.vertices.push(VertexD::new(0.0, 0.0, PATH_CMD_STOP));
        }
        self.vertices.len()
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.vertices.push(VertexD::new(x, y, PATH_CMD_MOVE_TO));
    }

    pub fn move_rel(&mut self, dx: f64, dy: f64) {
        let (x, y) = self.rel_to_abs(dx, dy);
        self.move_to(x, y);
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.vertices.push(VertexD::new(x, y, PATH_CMD_LINE_TO));
    }

    pub fn line_rel(&mut self, dx: f64, dy: f64) {
        let (x, y) = self.rel_to_abs(dx, dy);
        self.line_to(x, y);
    }

    /// Add an SVG-style elliptical arc from the last vertex to `(x, y)`.
    ///
    /// `angle` is the x-axis rotation in radians. With no current vertex
    /// this is a `move_to`. Radii below `1e-30` give a straight `line_to`,
    /// an endpoint equal to the current point adds nothing, and radii the
    /// arc cannot be fitted to also fall back to `line_to`. Otherwise the
    /// arc's cubic curves are joined to the path.
    #[allow(clippy::too_many_arguments)]
    pub fn arc_to(
        &mut self,
        rx: f64,
        ry: f64,
        angle: f64,
        large_arc_flag: bool,
        sweep_flag: bool,
        x: f64,
        y: f64,
    ) {
        let (mut x0, mut y0) = (0.0, 0.0);
        if !is_vertex(self.last_vertex_xy(&mut x0, &mut y0)) {
            self.move_to(x, y);
            return;
        }

        let rx = rx.abs();
        let ry = ry.abs();
        if rx < SVG_ARC_EPSILON || ry < SVG_ARC_EPSILON {
            trace!("path_storage: arc_to with zero radius, adding line_to");
            self.line_to(x, y);
            return;
        }
        if calc_distance(x0, y0, x, y) < SVG_ARC_EPSILON {
            return;
        }

        let mut arc =
            BezierArcSvg::new_with_params(x0, y0, rx, ry, angle, large_arc_flag, sweep_flag, x, y);
        if arc.radii_ok() {
            self.join_path(&mut arc, 0);
        } else {
            self.line_to(x, y);
        }
    }

    /// Relative form of [`arc_to`](Self::arc_to).
    #[allow(clippy::too_many_arguments)]
    pub fn arc_rel(
        &mut self,
        rx: f64,
        ry: f64,
        angle: f64,
        large_arc_flag: bool,
        sweep_flag: bool,
        dx: f64,
        dy: f64,
    ) {
        let (x, y) = self.rel_to_abs(dx, dy);
        self.arc_to(rx, ry, angle, large_arc_flag, sweep_flag, x, y);
    }

    /// Add an `end_poly` command with `flags`. Does nothing unless the
    /// last command is a vertex.
    pub fn end_poly(&mut self, flags: u32) {
        if is_vertex(self.last_command()) {
            self.vertices
                .push(VertexD::new(0.0, 0.0, PATH_CMD_END_POLY | flags));
        }
    }

    pub fn close_polygon(&mut self, flags: u32) {
        self.end_poly(PATH_FLAGS_CLOSE | flags);
    }

    // ---------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------

    pub fn total_vertices(&self) -> usize {
        self.vertices.len()
    }

    fn rel_to_abs(&self, dx: f64, dy: f64) -> (f64, f64) {
        match self.vertices.last() {
            Some(last) if is_vertex(last.cmd) => (dx + last.x, dy + last.y),
            _ => (dx, dy),
        }
    }

    /// Get the last vertex's (x, y) and command. Returns `PATH_CMD_STOP`
    /// and `(0, 0)` when the path is empty.
    pub fn last_vertex_xy(&self, x: &mut f64, y: &mut f64) -> u32 {
        match self.vertices.last() {
            Some(v) => {
                *x = v.x;
                *y = v.y;
                v.cmd
            }
            None => {
                *x = 0.0;
                *y = 0.0;
                PATH_CMD_STOP
            }
        }
    }

    pub fn last_command(&self) -> u32 {
        self.vertices.last().map_or(PATH_CMD_STOP, |v| v.cmd)
    }

    /// Get a vertex by index. Returns the command, or `PATH_CMD_STOP`
    /// past the end.
    pub fn vertex_idx(&self, idx: usize, x: &mut f64, y: &mut f64) -> u32 {
        match self.vertices.get(idx) {
            Some(v) => {
                *x = v.x;
                *y = v.y;
                v.cmd
            }
            None => PATH_CMD_STOP,
        }
    }

    // ---------------------------------------------------------------
    // Concatenation and joining
    // ---------------------------------------------------------------

    /// Append all vertices of `vs` as they are.
    pub fn concat_path(&mut self, vs: &mut dyn VertexSource, path_id: u32) {
        self.vertices.extend(path_vertices(vs, path_id));
    }

    /// Append `vs` with the pen kept down.
    ///
    /// Every `move_to` of `vs` becomes a `line_to`, except a first vertex
    /// on a path that is empty or ends in `stop`. A first vertex that
    /// coincides with the current point is dropped, as is a leading
    /// non-vertex command.
    pub fn join_path(&mut self, vs: &mut dyn VertexSource, path_id: u32) {
        let mut incoming = path_vertices(vs, path_id);
        let first = match incoming.next() {
            Some(v) => v,
            None => return,
        };

        if is_vertex(first.cmd) {
            let pen = self.vertices.last().copied().filter(|v| is_vertex(v.cmd));
            let cmd = match pen {
                Some(pen) => {
                    if calc_distance(first.x, first.y, pen.x, pen.y) > VERTEX_DIST_EPSILON {
                        Some(pen_down(first.cmd))
                    } else {
                        None
                    }
                }
                None if is_stop(self.last_command()) => Some(PATH_CMD_MOVE_TO),
                None => Some(pen_down(first.cmd)),
            };
            if let Some(cmd) = cmd {
                self.vertices.push(VertexD::new(first.x, first.y, cmd));
            }
        }

        self.vertices.extend(incoming.map(|v| VertexD::new(v.x, v.y, pen_down(v.cmd))));
    }
}

/// `move_to` becomes `line_to`; other commands pass through.
fn pen_down(cmd: u32) -> u32 {
    if is_move_to(cmd) {
        PATH_CMD_LINE_TO
    } else {
        cmd
    }
}

impl VertexSource for PathStorage {
    fn rewind(&mut self, path_id: u32) {
        self.iterator = path_id as usize;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        match self.vertices.get(self.iterator) {
            Some(v) => {
                *x = v.x;
                *y = v.y;
                self.iterator += 1;
                v.cmd
            }
            None => PATH_CMD_STOP,
        }
    }
}
