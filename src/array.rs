//! Distance-annotated vertex sequences.
//!
//! Port of `agg_vertex_sequence.h` and `agg_shorten_path.h`. AGG's
//! `pod_bvector` storage maps onto `Vec<T>`; what remains here is the
//! coincident-point filtering and endpoint trimming that the vertex
//! generators rely on.

use crate::math::{calc_distance, VERTEX_DIST_EPSILON};

// ============================================================================
// Vertex dist
// ============================================================================

/// A vertex with coordinates and the distance to the next vertex.
/// Port of C++ `vertex_dist`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexDist {
    pub x: f64,
    pub y: f64,
    pub dist: f64,
}

impl VertexDist {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, dist: 0.0 }
    }

    /// Calculate distance to `val` and store it. Returns `true` if the
    /// points are not coincident (distance > VERTEX_DIST_EPSILON).
    /// If coincident, sets dist to `1.0 / VERTEX_DIST_EPSILON`.
    pub fn calc_dist(&mut self, val: &VertexDist) -> bool {
        self.dist = calc_distance(self.x, self.y, val.x, val.y);
        let ret = self.dist > VERTEX_DIST_EPSILON;
        if !ret {
            self.dist = 1.0 / VERTEX_DIST_EPSILON;
        }
        ret
    }
}

// ============================================================================
// Vertex sequence
// ============================================================================

/// A sequence of vertices that filters coincident points.
///
/// Each stored vertex carries the distance to its successor. The check is
/// lazy: a vertex coincident with its predecessor is dropped when the next
/// one is added, or when the sequence is closed.
#[derive(Debug, Clone, Default)]
pub struct VertexSequence {
    vertices: Vec<VertexDist>,
}

impl VertexSequence {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append a vertex, first dropping the current last vertex if it
    /// coincides with the one before it.
    pub fn add(&mut self, val: VertexDist) {
        let len = self.vertices.len();
        if len > 1 {
            let last = self.vertices[len - 1];
            if !self.vertices[len - 2].calc_dist(&last) {
                self.vertices.pop();
            }
        }
        self.vertices.push(val);
    }

    /// Replace the last vertex (or append if the sequence is empty).
    pub fn modify_last(&mut self, val: VertexDist) {
        self.vertices.pop();
        self.add(val);
    }

    /// Finalize the sequence: compute the trailing distances and remove
    /// coincident vertices at the end. If `closed`, the last vertex also
    /// gets its distance to the first one, and is removed while it
    /// coincides with it.
    pub fn close(&mut self, closed: bool) {
        while self.vertices.len() > 1 {
            let len = self.vertices.len();
            let last = self.vertices[len - 1];
            if self.vertices[len - 2].calc_dist(&last) {
                break;
            }
            self.vertices.pop();
            self.modify_last(last);
        }

        if closed {
            while self.vertices.len() > 1 {
                let len = self.vertices.len();
                let first = self.vertices[0];
                if self.vertices[len - 1].calc_dist(&first) {
                    break;
                }
                self.vertices.pop();
            }
        }
    }

    pub fn remove_last(&mut self) {
        self.vertices.pop();
    }

    pub fn remove_all(&mut self) {
        self.vertices.clear();
    }

    pub fn as_slice(&self) -> &[VertexDist] {
        &self.vertices
    }
}

impl core::ops::Index<usize> for VertexSequence {
    type Output = VertexDist;

    fn index(&self, i: usize) -> &VertexDist {
        &self.vertices[i]
    }
}

impl core::ops::IndexMut<usize> for VertexSequence {
    fn index_mut(&mut self, i: usize) -> &mut VertexDist {
        &mut self.vertices[i]
    }
}

// ============================================================================
// Path shortening
// ============================================================================

/// Trim `s` units of length from the end of the path.
///
/// Whole trailing segments shorter than the remaining amount are dropped;
/// the last surviving segment is cut by interpolation. The first segment is
/// never dropped, so an amount longer than the path leaves a single,
/// overshooting first segment. A path reduced below two vertices is
/// cleared.
///
/// Port of C++ `shorten_path`.
pub fn shorten_path(vs: &mut VertexSequence, s: f64, closed: bool) {
    if s <= 0.0 || vs.size() <= 1 {
        return;
    }

    let mut s = s;
    let mut n = vs.size() - 2;
    while n > 0 {
        let d = vs[n].dist;
        if d > s {
            break;
        }
        vs.remove_last();
        s -= d;
        n -= 1;
    }

    if vs.size() < 2 {
        vs.remove_all();
        return;
    }

    let n = vs.size() - 1;
    let prev = vs[n - 1];
    let last = vs[n];
    let d = (prev.dist - s) / prev.dist;
    vs[n].x = prev.x + (last.x - prev.x) * d;
    vs[n].y = prev.y + (last.y - prev.y) * d;

    let last = vs[n];
    if !vs[n - 1].calc_dist(&last) {
        vs.remove_last();
    }
    vs.close(closed);
}

// ============================================================================
// Tests
// ============================================================================
