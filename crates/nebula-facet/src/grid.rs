//! Fixed-size 2D grids with a uniform padding border.
//!
//! [`BorderedGrid`] is indexed by logical coordinates in
//! `[-border, width + border) x [-border, height + border)`; the backing
//! buffer includes the border, so neighbour reads near an edge never fault.
//! [`FacetGrid`] anchors such a grid at a region's world rectangle.

use glam::IVec2;

use crate::region::Rect2;

/// A 2D buffer of `(width + 2*border) x (height + 2*border)` cells.
///
/// Coordinates are always translated by `+border`, never wrapped. Access
/// outside the bordered range is an invariant violation and panics.
#[derive(Clone, Debug, PartialEq)]
pub struct BorderedGrid<T> {
    width: usize,
    height: usize,
    border: usize,
    stride: usize,
    data: Vec<T>,
}

impl<T: Copy> BorderedGrid<T> {
    /// Allocates a grid and fills every cell, border included, with `initial`.
    pub fn new(width: usize, height: usize, border: usize, initial: T) -> Self {
        let stride = width + 2 * border;
        let rows = height + 2 * border;
        Self {
            width,
            height,
            border,
            stride,
            data: vec![initial; stride * rows],
        }
    }

    /// Reads the cell at logical `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside `[-border, width + border) x [-border, height + border)`.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> T {
        self.data[self.index(x, y)]
    }

    /// Writes the cell at logical `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the bordered range.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: T) {
        let index = self.index(x, y);
        self.data[index] = value;
    }

    /// Reads a cell, returning `None` outside the bordered range.
    pub fn try_get(&self, x: i32, y: i32) -> Option<T> {
        self.in_bounds(x, y).then(|| self.data[self.index(x, y)])
    }

    /// Sets every cell, border included.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> BorderedGrid<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn border(&self) -> usize {
        self.border
    }

    /// Returns `true` if logical `(x, y)` is addressable.
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        let b = self.border as i64;
        let (x, y) = (x as i64, y as i64);
        x >= -b && x < self.width as i64 + b && y >= -b && y < self.height as i64 + b
    }

    /// Backing buffer, border included, row-major.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        assert!(
            self.in_bounds(x, y),
            "BorderedGrid access ({x}, {y}) outside [-{b}, {w}+{b}) x [-{b}, {h}+{b})",
            b = self.border,
            w = self.width,
            h = self.height,
        );
        let ix = (x as i64 + self.border as i64) as usize;
        let iy = (y as i64 + self.border as i64) as usize;
        iy * self.stride + ix
    }
}

/// A [`BorderedGrid`] anchored at a region's world rectangle.
///
/// Logical `(0, 0)` is the region's minimum corner; the border extends the
/// valid world area by `border` columns on every side.
#[derive(Clone, Debug, PartialEq)]
pub struct FacetGrid<T> {
    region: Rect2,
    grid: BorderedGrid<T>,
}

impl<T: Copy> FacetGrid<T> {
    /// Creates a grid covering `region` plus `border` columns on each side.
    pub fn new(region: Rect2, border: u32, initial: T) -> Self {
        Self {
            region,
            grid: BorderedGrid::new(
                region.size.x.max(0) as usize,
                region.size.y.max(0) as usize,
                border as usize,
                initial,
            ),
        }
    }

    /// Reads by world column.
    #[inline]
    pub fn get_world(&self, p: IVec2) -> T {
        let rel = p - self.region.min;
        self.grid.get(rel.x, rel.y)
    }

    /// Writes by world column.
    #[inline]
    pub fn set_world(&mut self, p: IVec2, value: T) {
        let rel = p - self.region.min;
        self.grid.set(rel.x, rel.y, value);
    }

    /// Reads relative to the region's minimum corner.
    #[inline]
    pub fn get_relative(&self, rel: IVec2) -> T {
        self.grid.get(rel.x, rel.y)
    }

    #[inline]
    pub fn set_relative(&mut self, rel: IVec2, value: T) {
        self.grid.set(rel.x, rel.y, value);
    }

    /// Reads by world column, `None` outside [`FacetGrid::world_rect`].
    pub fn try_get_world(&self, p: IVec2) -> Option<T> {
        let rel = p - self.region.min;
        self.grid.try_get(rel.x, rel.y)
    }
}

impl<T> FacetGrid<T> {
    /// The region this grid was computed for, without border.
    pub fn inner_rect(&self) -> Rect2 {
        self.region
    }

    /// Every world column this grid holds a value for.
    pub fn world_rect(&self) -> Rect2 {
        self.region.expand(self.grid.border() as i32)
    }

    pub fn border(&self) -> u32 {
        self.grid.border() as u32
    }

    pub fn contains_world(&self, p: IVec2) -> bool {
        let rel = p - self.region.min;
        self.grid.in_bounds(rel.x, rel.y)
    }

    pub fn grid(&self) -> &BorderedGrid<T> {
        &self.grid
    }
}
