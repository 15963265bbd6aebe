//! Mirror symmetries of the world grid.
//!
//! Each variant splits the integer column grid into a canonical half and a
//! mirrored half. Samplers fold mirrored columns onto the canonical half
//! before evaluating noise, which makes the generated world exactly
//! mirror-symmetric.
//!
//! Folding is an integer involution: `mirror(mirror(p)) == p` for every
//! `p`, and every mirrored column maps to a distinct canonical column.
//! Columns lying on the axis itself (`x == z` for the positive diagonal,
//! `x + z == -1` for the negative diagonal) are fixed points and belong to
//! the canonical half. The axis-aligned variants have no fixed columns:
//! their axis runs between two columns.
//!
//! 2D points use `IVec2::x` for world X and `IVec2::y` for world Z.

use glam::{IVec2, Vec2};
use nebula_facet::Rect2;

/// Mirror axis selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symmetry {
    /// Mirror across the X axis: columns with `z < 0` fold to `(x, -z - 1)`.
    AxisX,
    /// Mirror across the Z axis: columns with `x < 0` fold to `(-x - 1, z)`.
    AxisZ,
    /// Mirror across `x == z`: columns with `x > z` fold to `(z, x)`.
    PositiveDiagonal,
    /// Mirror across `x + z == -1`: columns with `x + z < -1` fold to
    /// `(x - d, z - d)` where `d = x + z + 1`.
    NegativeDiagonal,
}

impl Symmetry {
    pub const ALL: [Symmetry; 4] = [
        Symmetry::AxisX,
        Symmetry::AxisZ,
        Symmetry::PositiveDiagonal,
        Symmetry::NegativeDiagonal,
    ];

    /// Returns `true` if `p` lies in the mirrored half.
    pub fn is_mirrored(&self, p: IVec2) -> bool {
        match self {
            Symmetry::AxisX => p.y < 0,
            Symmetry::AxisZ => p.x < 0,
            Symmetry::PositiveDiagonal => p.x > p.y,
            Symmetry::NegativeDiagonal => p.x + p.y < -1,
        }
    }

    /// Reflects `p` across the axis.
    ///
    /// Pure and total, but callers sample through [`Symmetry::canonical`],
    /// which only folds mirrored columns.
    pub fn mirror(&self, p: IVec2) -> IVec2 {
        match self {
            Symmetry::AxisX => IVec2::new(p.x, -p.y - 1),
            Symmetry::AxisZ => IVec2::new(-p.x - 1, p.y),
            Symmetry::PositiveDiagonal => IVec2::new(p.y, p.x),
            Symmetry::NegativeDiagonal => {
                let dist = p.x + p.y + 1;
                IVec2::new(p.x - dist, p.y - dist)
            }
        }
    }

    /// The canonical column a sampler should evaluate for `p`.
    pub fn canonical(&self, p: IVec2) -> IVec2 {
        if self.is_mirrored(p) { self.mirror(p) } else { p }
    }

    /// Reflects a continuous point. Integer columns map exactly as in
    /// [`Symmetry::mirror`].
    pub fn mirror_point(&self, p: Vec2) -> Vec2 {
        match self {
            Symmetry::AxisX => Vec2::new(p.x, -p.y - 1.0),
            Symmetry::AxisZ => Vec2::new(-p.x - 1.0, p.y),
            Symmetry::PositiveDiagonal => Vec2::new(p.y, p.x),
            Symmetry::NegativeDiagonal => {
                let dist = p.x + p.y + 1.0;
                Vec2::new(p.x - dist, p.y - dist)
            }
        }
    }

    /// Image of a rectangle under [`Symmetry::mirror`].
    pub fn mirror_rect(&self, rect: Rect2) -> Rect2 {
        let a = self.mirror(rect.min);
        let b = self.mirror(rect.max());
        Rect2::from_min_max(a.min(b), a.max(b))
    }

    /// Whether the reflection exchanges the X and Z axes.
    pub fn swaps_axes(&self) -> bool {
        matches!(
            self,
            Symmetry::PositiveDiagonal | Symmetry::NegativeDiagonal
        )
    }

    /// Euclidean distance from a continuous point to the mirror axis.
    pub fn distance_to_axis(&self, p: Vec2) -> f32 {
        match self {
            Symmetry::AxisX => (p.y + 0.5).abs(),
            Symmetry::AxisZ => (p.x + 0.5).abs(),
            Symmetry::PositiveDiagonal => (p.x - p.y).abs() / std::f32::consts::SQRT_2,
            Symmetry::NegativeDiagonal => (p.x + p.y + 1.0).abs() / std::f32::consts::SQRT_2,
        }
    }
}
