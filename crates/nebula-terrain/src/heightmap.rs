//! Multi-octave fractal Brownian motion (fBm) heightmap sampler.
//!
//! Composites octaves of simplex noise into a height offset. This is the
//! base noise function underneath [`InfiniteHeightField`](crate::InfiniteHeightField).

use noise::{NoiseFn, Simplex};

/// Configuration for multi-octave fBm noise.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightmapParams {
    /// World seed. All 64 bits participate (see [`fold_seed`]).
    pub seed: u64,
    /// Number of noise octaves to composite. Typical range: 3–6.
    pub octaves: u32,
    /// Frequency multiplier between successive octaves. Default: 2.0.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves. Default: 0.5.
    pub persistence: f64,
    /// Frequency of the first octave, in cycles per voxel. Default: 0.01.
    pub base_frequency: f64,
    /// Amplitude of the first octave, in voxels. Default: 16.0.
    pub amplitude: f64,
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            base_frequency: 0.01,
            amplitude: 16.0,
        }
    }
}

/// Folds a 64-bit world seed into the 32-bit seed the noise permutation table takes.
pub fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

/// fBm over simplex noise. Stateless per sample and `Sync`.
#[derive(Clone, Debug)]
pub struct HeightmapSampler {
    noise: Simplex,
    params: HeightmapParams,
}

impl HeightmapSampler {
    pub fn new(params: HeightmapParams) -> Self {
        let noise = Simplex::new(fold_seed(params.seed));
        Self { noise, params }
    }

    /// Height offset at world column `(x, z)`, in `[-max_amplitude, max_amplitude]`.
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.params.base_frequency;
        let mut amplitude = self.params.amplitude;

        for _ in 0..self.params.octaves {
            total += self.noise.get([x * frequency, z * frequency]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        total
    }

    /// Geometric sum of all octave amplitudes.
    pub fn max_amplitude(&self) -> f64 {
        let mut sum = 0.0;
        let mut amp = self.params.amplitude;
        for _ in 0..self.params.octaves {
            sum += amp;
            amp *= self.params.persistence;
        }
        sum
    }

    pub fn params(&self) -> &HeightmapParams {
        &self.params
    }
}
