//! Shape rasterizers.
//!
//! Each rasterizer clips the shape's footprint against the brush region
//! first and does nothing when they do not overlap. Inside the intersection,
//! heights are computed in shape-local coordinates: `(0, 0)` is the
//! footprint's minimum corner.

mod building;
mod opening;
mod road;
mod roof;

use nebula_terrain::HeightSlice;

use crate::brush::Brush;
use crate::shape::ShapeDescriptor;

pub use opening::OpeningRasterizer;
pub use road::RoadRasterizer;
pub use roof::RoofRasterizer;

/// Writes one kind of shape through a [`Brush`].
pub trait Rasterizer<S> {
    fn raster(&self, brush: &mut Brush<'_>, shape: &S);
}

/// Dispatches any [`ShapeDescriptor`] to the rasterizer for its variant.
pub struct ShapeRasterizer<'a> {
    roads: RoadRasterizer<'a>,
}

impl<'a> ShapeRasterizer<'a> {
    /// Roads are draped over `surface`.
    pub fn new(surface: &'a HeightSlice) -> Self {
        Self {
            roads: RoadRasterizer::new(surface),
        }
    }
}

impl Rasterizer<ShapeDescriptor> for ShapeRasterizer<'_> {
    fn raster(&self, brush: &mut Brush<'_>, shape: &ShapeDescriptor) {
        match shape {
            ShapeDescriptor::FlatRoof(s) => RoofRasterizer.raster(brush, s),
            ShapeDescriptor::HipRoof(s) => RoofRasterizer.raster(brush, s),
            ShapeDescriptor::SaddleRoof(s) => RoofRasterizer.raster(brush, s),
            ShapeDescriptor::PentRoof(s) => RoofRasterizer.raster(brush, s),
            ShapeDescriptor::DomeRoof(s) => RoofRasterizer.raster(brush, s),
            ShapeDescriptor::SimpleWindow(s) => OpeningRasterizer.raster(brush, s),
            ShapeDescriptor::RectWindow(s) => OpeningRasterizer.raster(brush, s),
            ShapeDescriptor::SimpleDoor(s) => OpeningRasterizer.raster(brush, s),
            ShapeDescriptor::RoadSegment(s) => self.roads.raster(brush, s),
        }
    }
}
