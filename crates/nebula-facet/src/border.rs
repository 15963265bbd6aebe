//! Facet borders: how far beyond a region a facet must be valid.

use glam::{IVec2, IVec3};

use crate::region::{Rect2, Region3};

/// Extra margin of validity around a region.
///
/// `sides` applies to the four horizontal directions, `top` and `bottom`
/// to the vertical extent. Borders compose additively along a dependency
/// chain (see [`Border3::extend`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Border3 {
    pub top: u32,
    pub bottom: u32,
    pub sides: u32,
}

impl Border3 {
    pub const ZERO: Self = Self::new(0, 0, 0);

    pub const fn new(top: u32, bottom: u32, sides: u32) -> Self {
        Self { top, bottom, sides }
    }

    /// A border on the horizontal sides only.
    pub const fn sides(amount: u32) -> Self {
        Self::new(0, 0, amount)
    }

    /// Composes two borders: a consumer needing `other` of a facet that is
    /// itself computed with `self` needs their sum upstream. Saturates.
    pub fn extend(&self, other: &Border3) -> Border3 {
        Border3::new(
            self.top.saturating_add(other.top),
            self.bottom.saturating_add(other.bottom),
            self.sides.saturating_add(other.sides),
        )
    }

    /// Component-wise maximum.
    pub fn max(&self, other: &Border3) -> Border3 {
        Border3::new(
            self.top.max(other.top),
            self.bottom.max(other.bottom),
            self.sides.max(other.sides),
        )
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Grows `region` by this border.
    pub fn expand(&self, region: Region3) -> Region3 {
        let sides = self.sides as i32;
        let min = region.min - IVec3::new(sides, self.bottom as i32, sides);
        let size = region.size
            + IVec3::new(
                2 * sides,
                (self.top + self.bottom) as i32,
                2 * sides,
            );
        Region3::new(min, size)
    }

    /// Grows a horizontal rectangle by the side border.
    pub fn expand_rect(&self, rect: Rect2) -> Rect2 {
        let sides = self.sides as i32;
        Rect2::new(rect.min - IVec2::splat(sides), rect.size + IVec2::splat(2 * sides))
    }
}

impl std::ops::Add for Border3 {
    type Output = Border3;

    fn add(self, rhs: Border3) -> Border3 {
        self.extend(&rhs)
    }
}
