//! Affine transformation matrix.
//!
//! The subset of `agg_trans_affine.h` that arc generation needs: rotation
//! and translation, chained and applied to points. General transform math
//! belongs to the consumer.

use std::ops::Mul;

/// 2D affine transformation matrix.
///
/// ```text
///   | sx  shx tx |
///   | shy  sy ty |
///   |  0    0  1 |
/// ```
///
/// A point maps as `x' = x*sx + y*shx + tx`, `y' = x*shy + y*sy + ty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransAffine {
    pub sx: f64,
    pub shy: f64,
    pub shx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl TransAffine {
    pub const IDENTITY: TransAffine = TransAffine {
        sx: 1.0,
        shy: 0.0,
        shx: 0.0,
        sy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Counter-clockwise rotation by `a` radians about the origin.
    pub fn rotation(a: f64) -> Self {
        let (sin, cos) = a.sin_cos();
        Self {
            sx: cos,
            shy: sin,
            shx: -sin,
            sy: cos,
            ..Self::IDENTITY
        }
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    /// The transform that applies `self` first and `next` second.
    pub fn then(&self, next: &TransAffine) -> Self {
        let (tx, ty) = next.apply(self.tx, self.ty);
        Self {
            sx: self.sx * next.sx + self.shy * next.shx,
            shy: self.sx * next.shy + self.shy * next.sy,
            shx: self.shx * next.sx + self.sy * next.shx,
            sy: self.shx * next.shy + self.sy * next.sy,
            tx,
            ty,
        }
    }

    /// Map the point `(x, y)`.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.sx + y * self.shx + self.tx,
            x * self.shy + y * self.sy + self.ty,
        )
    }

    /// Map every `[x, y]` pair of a flat coordinate buffer in place.
    pub fn apply_to_coords(&self, coords: &mut [f64]) {
        for pt in coords.chunks_exact_mut(2) {
            let (x, y) = self.apply(pt[0], pt[1]);
            pt[0] = x;
            pt[1] = y;
        }
    }
}

impl Default for TransAffine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `a * b` applies `a` first, then `b`.
impl Mul for TransAffine {
    type Output = TransAffine;

    fn mul(self, rhs: TransAffine) -> TransAffine {
        self.then(&rhs)
    }
}
