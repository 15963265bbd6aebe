//! End-to-end generation through the assembled pipeline.

use std::collections::HashMap;

use glam::{IVec2, IVec3};
use nebula_config::{Config, SymmetryMode};
use nebula_facet::Rect2;
use nebula_structures::{BUILDINGS, BlockType, ROADS, SETTLEMENTS, TreeSpawn};
use nebula_worldgen::{RegionOutput, WorldGenerator};

fn config(seed: u64) -> Config {
    let mut config = Config::default();
    config.world.seed = seed;
    config.world.region_size = [32, 96, 32];
    config.settlements.spawn_chance = 0.9;
    config
}

fn generator(config: &Config) -> WorldGenerator {
    WorldGenerator::from_config(config).unwrap()
}

#[test]
fn test_same_seed_same_world() {
    let a = generator(&config(5));
    let b = generator(&config(5));
    for cell in [IVec3::ZERO, IVec3::new(-3, 0, 2)] {
        let ra = a.generate_region(a.region_at(cell)).unwrap();
        let rb = b.generate_region(b.region_at(cell)).unwrap();
        assert_eq!(ra.blocks, rb.blocks, "blocks differ at {cell}");
        assert_eq!(ra.trees, rb.trees, "trees differ at {cell}");
    }
}

#[test]
fn test_different_seeds_differ() {
    let a = generator(&config(5));
    let b = generator(&config(6));
    let region = a.region_at(IVec3::ZERO);
    assert_ne!(
        a.generate_region(region).unwrap().blocks,
        b.generate_region(region).unwrap().blocks
    );
}

#[test]
fn test_generation_order_does_not_matter() {
    let cells = [IVec3::new(0, 0, 0), IVec3::new(1, 0, 0), IVec3::new(0, 0, -1)];
    let forward = generator(&config(11));
    let backward = generator(&config(11));
    let a: Vec<_> = cells
        .iter()
        .map(|c| forward.generate_region(forward.region_at(*c)).unwrap().blocks)
        .collect();
    let mut b: Vec<_> = cells
        .iter()
        .rev()
        .map(|c| backward.generate_region(backward.region_at(*c)).unwrap().blocks)
        .collect();
    b.reverse();
    assert_eq!(a, b);
}

#[test]
fn test_cache_does_not_change_output() {
    let cached = generator(&config(3));
    let mut uncached_config = config(3);
    uncached_config.pipeline.cache_enabled = false;
    let uncached = generator(&uncached_config);
    let region = cached.region_at(IVec3::new(2, 0, 1));
    assert_eq!(
        cached.generate_region(region).unwrap().blocks,
        uncached.generate_region(region).unwrap().blocks
    );
    assert_eq!(uncached.cache_stats().entries, 0);
}

#[test]
fn test_purge_empties_cache_and_regenerates_identically() {
    let world = generator(&config(8));
    let region = world.region_at(IVec3::new(-1, 0, -1));
    let first = world.generate_region(region).unwrap();
    let _ = world.generate_region(region).unwrap();
    let stats = world.cache_stats();
    assert_eq!(stats.entries, 1);
    assert!(stats.hits >= 1, "Second request should hit the cache: {stats:?}");

    world.purge();
    assert_eq!(world.cache_stats().entries, 0);
    let again = world.generate_region(region).unwrap();
    assert_eq!(first.blocks, again.blocks);
    assert_eq!(first.trees, again.trees);
}

#[test]
fn test_adjacent_regions_agree_on_shared_roads() {
    let world = generator(&config(21));
    let left = world.facets(world.region_at(IVec3::new(0, 0, 0))).unwrap();
    let right = world.facets(world.region_at(IVec3::new(1, 0, 0))).unwrap();
    let right_rect = world.region_at(IVec3::new(1, 0, 0)).rect();
    for road in left.get(ROADS).unwrap() {
        if road.footprint().intersects(&right_rect) {
            assert!(
                right.get(ROADS).unwrap().contains(road),
                "{road:?} missing from the neighbouring region"
            );
        }
    }
}

#[test]
fn test_trees_stand_on_solid_ground() {
    let world = generator(&config(13));
    let mut checked = 0;
    for cell in [IVec3::ZERO, IVec3::new(1, 0, 1), IVec3::new(-2, 0, 0)] {
        let output = world.generate_region(world.region_at(cell)).unwrap();
        for tree in &output.trees {
            let below = output.blocks.get(tree.position - IVec3::Y);
            if let Some(block) = below {
                assert!(block.is_solid(), "tree at {} stands on {block:?}", tree.position);
                assert_ne!(block, BlockType::Gravel, "tree on a road at {}", tree.position);
                checked += 1;
            }
        }
    }
    assert!(checked > 0, "Expected at least one tree");
}

#[test]
fn test_buildings_sit_on_flattened_ground() {
    let world = generator(&config(2));
    let mut floors = 0;
    for z in -4..4 {
        for x in -4..4 {
            let region = world.region_at(IVec3::new(x, 0, z));
            let facets = world.facets(region).unwrap();
            let settlements = facets.get(SETTLEMENTS).unwrap();
            for building in facets.get(BUILDINGS).unwrap() {
                let site = settlements
                    .iter()
                    .find(|s| s.contains(building.footprint.min.as_vec2()))
                    .expect("building outside every settlement");
                assert_eq!(building.floor_y, site.ground_height);
                floors += 1;
            }
        }
    }
    assert!(floors > 0, "Expected at least one building in 256x256 columns");
}

/// Blocks placed by structures rather than terrain.
fn is_structure(block: BlockType) -> bool {
    !matches!(
        block,
        BlockType::Air
            | BlockType::Stone
            | BlockType::Dirt
            | BlockType::Grass
            | BlockType::Sand
            | BlockType::Water
    )
}

/// Generates a 6 x 6 square of regions around the origin, a set every
/// symmetry maps onto itself, and checks each region against its mirror
/// image block by block and tree by tree. Returns the number of structure
/// blocks seen.
fn mirrored_world_matches(symmetry: SymmetryMode, seed: u64) -> usize {
    let mut config = config(seed);
    config.world.symmetry = symmetry;
    let world = generator(&config);
    let sym = nebula_worldgen::symmetry_of(symmetry).unwrap();

    let outputs: HashMap<IVec3, RegionOutput> = (-3..3)
        .flat_map(|z| (-3..3).map(move |x| IVec3::new(x, 0, z)))
        .map(|cell| {
            let output = world.generate_region(world.region_at(cell)).unwrap();
            (output.region.min, output)
        })
        .collect();

    let mut structures = 0;
    for (min, a) in &outputs {
        let rect: Rect2 = a.region.rect();
        let mirrored = sym.mirror_rect(rect);
        let b = &outputs[&IVec3::new(mirrored.min.x, min.y, mirrored.min.y)];
        for p in rect.iter() {
            let m: IVec2 = sym.mirror(p);
            for y in a.region.min_y()..=a.region.max_y() {
                let block = a.blocks.get(IVec3::new(p.x, y, p.y));
                assert_eq!(
                    block,
                    b.blocks.get(IVec3::new(m.x, y, m.y)),
                    "{symmetry:?} seed {seed}: ({}, {y}, {}) and its mirror differ",
                    p.x,
                    p.y
                );
                if block.is_some_and(is_structure) {
                    structures += 1;
                }
            }
        }

        let mut expected: Vec<_> = a
            .trees
            .iter()
            .map(|t| {
                let m = sym.mirror(IVec2::new(t.position.x, t.position.z));
                TreeSpawn {
                    position: IVec3::new(m.x, t.position.y, m.y),
                    kind: t.kind,
                }
            })
            .collect();
        let mut actual = b.trees.clone();
        let key = |t: &TreeSpawn| (t.position.z, t.position.x);
        expected.sort_by_key(key);
        actual.sort_by_key(key);
        assert_eq!(expected, actual, "{symmetry:?} seed {seed}: trees of {min} not mirrored");
    }
    structures
}

fn assert_symmetric_with_structures(symmetry: SymmetryMode) {
    let structures: usize = [3, 17, 99]
        .into_iter()
        .map(|seed| mirrored_world_matches(symmetry, seed))
        .sum();
    assert!(structures > 0, "{symmetry:?}: no structure blocks to compare");
}

#[test]
fn test_axis_x_symmetry_mirrors_world() {
    assert_symmetric_with_structures(SymmetryMode::AxisX);
}

#[test]
fn test_axis_z_symmetry_mirrors_world() {
    assert_symmetric_with_structures(SymmetryMode::AxisZ);
}

#[test]
fn test_positive_diagonal_symmetry_mirrors_world() {
    assert_symmetric_with_structures(SymmetryMode::PositiveDiagonal);
}

#[test]
fn test_negative_diagonal_symmetry_mirrors_world() {
    assert_symmetric_with_structures(SymmetryMode::NegativeDiagonal);
}
