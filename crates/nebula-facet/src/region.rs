//! Axis-aligned integer rectangles and boxes in world space.
//!
//! 2D rectangles live in the horizontal plane: `IVec2::x` is world X and
//! `IVec2::y` is world Z. All `max()` accessors are inclusive.

use glam::{IVec2, IVec3};

/// A horizontal rectangle of voxel columns, identified by its minimum corner and extents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect2 {
    /// Minimum corner (inclusive).
    pub min: IVec2,
    /// Extents along X and Z. Never negative.
    pub size: IVec2,
}

impl Rect2 {
    /// Creates a rectangle from its minimum corner and size.
    pub fn new(min: IVec2, size: IVec2) -> Self {
        debug_assert!(
            size.x >= 0 && size.y >= 0,
            "Rect2 size must be non-negative, got {size}"
        );
        Self { min, size }
    }

    /// Creates a rectangle spanning `min..=max` on both axes.
    pub fn from_min_max(min: IVec2, max: IVec2) -> Self {
        Self::new(min, max - min + IVec2::ONE)
    }

    /// Inclusive maximum corner.
    pub fn max(&self) -> IVec2 {
        self.min + self.size - IVec2::ONE
    }

    pub fn width(&self) -> i32 {
        self.size.x
    }

    pub fn height(&self) -> i32 {
        self.size.y
    }

    /// Number of columns covered.
    pub fn area(&self) -> usize {
        (self.size.x.max(0) as usize) * (self.size.y.max(0) as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0 || self.size.y <= 0
    }

    /// Returns `true` if `p` lies inside the rectangle.
    pub fn contains(&self, p: IVec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }

    /// Returns `true` if `other` lies completely inside `self`.
    pub fn contains_rect(&self, other: &Rect2) -> bool {
        other.is_empty() || (self.contains(other.min) && self.contains(other.max()))
    }

    /// Intersection of two rectangles, or `None` if they do not overlap.
    pub fn intersect(&self, other: &Rect2) -> Option<Rect2> {
        let min = self.min.max(other.min);
        let max = self.max().min(other.max());
        if min.x > max.x || min.y > max.y {
            return None;
        }
        Some(Rect2::from_min_max(min, max))
    }

    pub fn intersects(&self, other: &Rect2) -> bool {
        self.intersect(other).is_some()
    }

    /// Grows the rectangle by `amount` columns on every side.
    pub fn expand(&self, amount: i32) -> Rect2 {
        Rect2::new(
            self.min - IVec2::splat(amount),
            (self.size + IVec2::splat(2 * amount)).max(IVec2::ZERO),
        )
    }

    /// Iterates every column, row by row (Z outer, X inner).
    pub fn iter(&self) -> impl Iterator<Item = IVec2> + use<> {
        let min = self.min;
        let size = self.size.max(IVec2::ZERO);
        (0..size.y).flat_map(move |z| (0..size.x).map(move |x| IVec2::new(min.x + x, min.y + z)))
    }
}

/// A box of voxels: the unit of pipeline processing.
///
/// Regions bound data, they never own it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region3 {
    /// Minimum corner (inclusive).
    pub min: IVec3,
    /// Extents along X, Y and Z. Never negative.
    pub size: IVec3,
}

impl Region3 {
    pub fn new(min: IVec3, size: IVec3) -> Self {
        debug_assert!(
            size.x >= 0 && size.y >= 0 && size.z >= 0,
            "Region3 size must be non-negative, got {size}"
        );
        Self { min, size }
    }

    /// Region at grid cell `cell` of a lattice of `size`-sized regions.
    pub fn from_grid_cell(cell: IVec3, size: IVec3) -> Self {
        Self::new(cell * size, size)
    }

    /// Inclusive maximum corner.
    pub fn max(&self) -> IVec3 {
        self.min + self.size - IVec3::ONE
    }

    pub fn contains(&self, p: IVec3) -> bool {
        let max = self.max();
        p.cmpge(self.min).all() && p.cmple(max).all()
    }

    /// Horizontal footprint of the region.
    pub fn rect(&self) -> Rect2 {
        Rect2::new(
            IVec2::new(self.min.x, self.min.z),
            IVec2::new(self.size.x, self.size.z),
        )
    }

    pub fn min_y(&self) -> i32 {
        self.min.y
    }

    /// Inclusive top layer.
    pub fn max_y(&self) -> i32 {
        self.min.y + self.size.y - 1
    }

    pub fn volume(&self) -> usize {
        let s = self.size.max(IVec3::ZERO);
        s.x as usize * s.y as usize * s.z as usize
    }
}
