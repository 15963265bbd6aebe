//! Deterministic seeded generation utilities.
//!
//! Structure placement is driven by a coarse cell grid: every cell gets its
//! own RNG derived from the world seed, a per-feature salt and the cell
//! coordinate, so any region can reproduce the decisions of any cell without
//! knowing which region asked first.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::IVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Combine the world seed, a feature salt and a cell coordinate into a u64.
///
/// Uses SipHash (via std's `DefaultHasher`) for a well-distributed result.
pub fn derive_cell_seed(world_seed: u64, salt: u64, cell: IVec2) -> u64 {
    let mut hasher = DefaultHasher::new();
    world_seed.hash(&mut hasher);
    salt.hash(&mut hasher);
    cell.x.hash(&mut hasher);
    cell.y.hash(&mut hasher);
    hasher.finish()
}

/// Deterministic RNG for one placement cell.
///
/// Produces the same sequence for the same `(world_seed, salt, cell)` on
/// every thread and platform.
pub fn cell_rng(world_seed: u64, salt: u64, cell: IVec2) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_cell_seed(world_seed, salt, cell))
}

/// Cell containing world column `p` on a grid of `cell_size` columns.
pub fn cell_of(p: IVec2, cell_size: i32) -> IVec2 {
    IVec2::new(p.x.div_euclid(cell_size), p.y.div_euclid(cell_size))
}

/// Every cell whose area intersects the inclusive column range `[min, max]`.
pub fn cells_covering(min: IVec2, max: IVec2, cell_size: i32) -> impl Iterator<Item = IVec2> {
    let lo = cell_of(min, cell_size);
    let hi = cell_of(max, cell_size);
    (lo.y..=hi.y).flat_map(move |z| (lo.x..=hi.x).map(move |x| IVec2::new(x, z)))
}
