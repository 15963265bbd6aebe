//! The infinite, optionally mirror-symmetric height field.

use glam::IVec2;

use crate::heightmap::{HeightmapParams, HeightmapSampler};
use crate::symmetry::Symmetry;

/// A deterministic height function over continuous world coordinates.
pub trait HeightFunction: Send + Sync {
    fn height(&self, x: f64, z: f64) -> f64;
}

impl HeightFunction for HeightmapSampler {
    fn height(&self, x: f64, z: f64) -> f64 {
        self.sample(x, z)
    }
}

impl<F> HeightFunction for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn height(&self, x: f64, z: f64) -> f64 {
        self(x, z)
    }
}

/// World column to surface height: `base_height + noise(canonical(p))`.
///
/// Stateless per sample. With a [`Symmetry`] configured, mirrored columns
/// are folded onto the canonical half first, so the field is exactly
/// mirror-symmetric.
#[derive(Clone, Debug)]
pub struct InfiniteHeightField<F = HeightmapSampler> {
    noise: F,
    base_height: f32,
    symmetry: Option<Symmetry>,
}

impl InfiniteHeightField<HeightmapSampler> {
    /// fBm field for the given parameters.
    pub fn from_params(params: HeightmapParams, base_height: f32, symmetry: Option<Symmetry>) -> Self {
        Self::new(HeightmapSampler::new(params), base_height, symmetry)
    }
}

impl<F: HeightFunction> InfiniteHeightField<F> {
    pub fn new(noise: F, base_height: f32, symmetry: Option<Symmetry>) -> Self {
        Self {
            noise,
            base_height,
            symmetry,
        }
    }

    /// Height at world column `p`.
    pub fn sample(&self, p: IVec2) -> f32 {
        if let Some(symmetry) = self.symmetry
            && symmetry.is_mirrored(p)
        {
            return self.sample(symmetry.mirror(p));
        }
        self.base_height + self.noise.height(p.x as f64, p.y as f64) as f32
    }

    pub fn symmetry(&self) -> Option<Symmetry> {
        self.symmetry
    }

    pub fn base_height(&self) -> f32 {
        self.base_height
    }
}
