//! A bounded window of the infinite height field, materialized once per region.

use glam::IVec2;
use nebula_facet::{FacetGrid, Rect2};

use crate::height_field::{HeightFunction, InfiniteHeightField};

/// Surface heights for a region plus border.
///
/// Built by [`HeightSlice::materialize`], which is the only place the
/// height field is evaluated per region; every downstream reader gets O(1)
/// lookups from the cached grid.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightSlice {
    grid: FacetGrid<f32>,
}

impl HeightSlice {
    /// Samples every column of `region` expanded by `border`, exactly once.
    pub fn materialize<F: HeightFunction>(
        field: &InfiniteHeightField<F>,
        region: Rect2,
        border: u32,
    ) -> Self {
        let mut grid = FacetGrid::new(region, border, 0.0);
        for p in grid.world_rect().iter() {
            grid.set_world(p, field.sample(p));
        }
        Self { grid }
    }

    /// Height at world column `p`.
    ///
    /// # Panics
    ///
    /// Panics if `p` lies outside [`HeightSlice::world_rect`].
    pub fn height(&self, p: IVec2) -> f32 {
        self.grid.get_world(p)
    }

    /// Topmost solid voxel layer of column `p`.
    pub fn surface_y(&self, p: IVec2) -> i32 {
        self.height(p).floor() as i32
    }

    pub fn try_height(&self, p: IVec2) -> Option<f32> {
        self.grid.try_get_world(p)
    }

    pub fn set_height(&mut self, p: IVec2, height: f32) {
        self.grid.set_world(p, height);
    }

    pub fn inner_rect(&self) -> Rect2 {
        self.grid.inner_rect()
    }

    pub fn world_rect(&self) -> Rect2 {
        self.grid.world_rect()
    }

    pub fn border(&self) -> u32 {
        self.grid.border()
    }

    pub fn grid(&self) -> &FacetGrid<f32> {
        &self.grid
    }

    /// Lowest and highest height over the inner region.
    pub fn min_max(&self) -> (f32, f32) {
        self.inner_rect()
            .iter()
            .map(|p| self.height(p))
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), h| {
                (lo.min(h), hi.max(h))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightmap::HeightmapParams;
    use crate::symmetry::Symmetry;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_materialize_samples_each_column_once() {
        let calls = AtomicUsize::new(0);
        let field = InfiniteHeightField::new(
            |x: f64, z: f64| {
                calls.fetch_add(1, Ordering::Relaxed);
                x + z
            },
            0.0,
            None,
        );
        let region = Rect2::new(IVec2::new(10, 20), IVec2::new(16, 8));
        let slice = HeightSlice::materialize(&field, region, 3);

        assert_eq!(calls.load(Ordering::Relaxed), (16 + 6) * (8 + 6));
        assert_eq!(slice.world_rect(), region.expand(3));
        assert_eq!(slice.height(IVec2::new(7, 17)), 24.0);
        assert_eq!(slice.height(IVec2::new(28, 30)), 58.0);
    }

    #[test]
    fn test_slice_matches_field() {
        let field = InfiniteHeightField::from_params(
            HeightmapParams {
                seed: 5,
                ..Default::default()
            },
            40.0,
            Some(Symmetry::AxisZ),
        );
        let region = Rect2::new(IVec2::new(-8, -8), IVec2::new(16, 16));
        let slice = HeightSlice::materialize(&field, region, 2);
        for p in slice.world_rect().iter() {
            assert_eq!(slice.height(p).to_bits(), field.sample(p).to_bits());
        }
        assert_eq!(slice.surface_y(IVec2::ZERO), field.sample(IVec2::ZERO).floor() as i32);
    }

    #[test]
    fn test_adjacent_slices_agree_on_shared_border() {
        let field = InfiniteHeightField::from_params(HeightmapParams::default(), 32.0, None);
        let left = HeightSlice::materialize(&field, Rect2::new(IVec2::ZERO, IVec2::splat(16)), 4);
        let right = HeightSlice::materialize(
            &field,
            Rect2::new(IVec2::new(16, 0), IVec2::splat(16)),
            4,
        );
        for z in 0..16 {
            for x in 12..20 {
                let p = IVec2::new(x, z);
                assert_eq!(left.height(p), right.height(p), "Seam mismatch at {p}");
            }
        }
    }

    #[test]
    fn test_min_max_over_inner_region() {
        let field = InfiniteHeightField::new(|x: f64, _z: f64| x, 0.0, None);
        let slice = HeightSlice::materialize(&field, Rect2::new(IVec2::new(0, 0), IVec2::new(4, 4)), 2);
        assert_eq!(slice.min_max(), (0.0, 3.0));
    }
}
