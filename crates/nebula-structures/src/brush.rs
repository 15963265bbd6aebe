//! The voxel-write boundary.
//!
//! A [`Brush`] wraps one region's output for the duration of a single
//! rasterization pass. It clips shape footprints against the region,
//! translates world coordinates to region-local ones and silently drops
//! writes that fall outside the region.

use glam::{IVec2, IVec3};
use nebula_facet::{Rect2, Region3};

use crate::block::BlockType;

/// Destination for region-local voxel writes.
pub trait BlockSink {
    /// The world-space box this sink stores.
    fn region(&self) -> Region3;

    /// Stores `block` at `local`, which is always inside `0..region().size`.
    fn write(&mut self, local: IVec3, block: BlockType);
}

/// Clipping, translating front end to a [`BlockSink`].
pub struct Brush<'a> {
    sink: &'a mut dyn BlockSink,
    region: Region3,
    writes: usize,
    skipped: usize,
}

impl<'a> Brush<'a> {
    pub fn new(sink: &'a mut dyn BlockSink) -> Self {
        let region = sink.region();
        Self {
            sink,
            region,
            writes: 0,
            skipped: 0,
        }
    }

    pub fn region(&self) -> Region3 {
        self.region
    }

    /// Part of `footprint` inside the region, or `None` if nothing overlaps.
    pub fn intersection(&self, footprint: Rect2) -> Option<Rect2> {
        self.region.rect().intersect(&footprint)
    }

    /// Writes one voxel at a world position.
    ///
    /// Returns `false`, without touching the sink, if the position lies
    /// outside the region.
    pub fn set_block(&mut self, world: IVec3, block: BlockType) -> bool {
        if !self.region.contains(world) {
            self.skipped += 1;
            return false;
        }
        self.sink.write(world - self.region.min, block);
        self.writes += 1;
        true
    }

    /// Fills column `p` over the half-open layer range `[from_y, to_y)`.
    pub fn fill_column(&mut self, p: IVec2, from_y: i32, to_y: i32, block: BlockType) {
        if !self.region.rect().contains(p) {
            self.skipped += (to_y - from_y).max(0) as usize;
            return;
        }
        let lo = from_y.max(self.region.min_y());
        let hi = to_y.min(self.region.max_y() + 1);
        self.skipped += (to_y - from_y).max(0) as usize - (hi - lo).max(0) as usize;
        for y in lo..hi {
            self.sink.write(IVec3::new(p.x, y, p.y) - self.region.min, block);
            self.writes += 1;
        }
    }

    /// Writes one layer `y` over every column of `rect` inside the region.
    pub fn fill_rect(&mut self, rect: Rect2, y: i32, block: BlockType) {
        let Some(area) = self.intersection(rect) else {
            self.skipped += rect.area();
            return;
        };
        self.skipped += rect.area() - area.area();
        for p in area.iter() {
            self.set_block(IVec3::new(p.x, y, p.y), block);
        }
    }

    /// Voxels written so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Writes dropped for lying outside the region.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Dense block storage for one region, `Air` by default.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionBlockBuffer {
    region: Region3,
    blocks: Vec<BlockType>,
}

impl RegionBlockBuffer {
    pub fn new(region: Region3) -> Self {
        Self {
            region,
            blocks: vec![BlockType::Air; region.volume()],
        }
    }

    fn index(&self, local: IVec3) -> usize {
        let size = self.region.size;
        ((local.y * size.z + local.z) * size.x + local.x) as usize
    }

    /// Block at a world position, `None` outside the region.
    pub fn get(&self, world: IVec3) -> Option<BlockType> {
        self.region
            .contains(world)
            .then(|| self.blocks[self.index(world - self.region.min)])
    }

    /// Highest non-air layer of column `p`.
    pub fn top_y(&self, p: IVec2) -> Option<i32> {
        (self.region.min_y()..=self.region.max_y())
            .rev()
            .find(|&y| matches!(self.get(IVec3::new(p.x, y, p.y)), Some(b) if b != BlockType::Air))
    }

    pub fn count(&self, block: BlockType) -> usize {
        self.blocks.iter().filter(|b| **b == block).count()
    }

    pub fn non_air_count(&self) -> usize {
        self.blocks.len() - self.count(BlockType::Air)
    }

    /// Every non-air voxel as a world-space `(position, block)` pair.
    pub fn iter_world(&self) -> impl Iterator<Item = (IVec3, BlockType)> + '_ {
        let size = self.region.size;
        let min = self.region.min;
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| **b != BlockType::Air)
            .map(move |(i, b)| {
                let i = i as i32;
                let x = i % size.x;
                let z = (i / size.x) % size.z;
                let y = i / (size.x * size.z);
                (min + IVec3::new(x, y, z), *b)
            })
    }

    pub fn as_slice(&self) -> &[BlockType] {
        &self.blocks
    }
}

impl BlockSink for RegionBlockBuffer {
    fn region(&self) -> Region3 {
        self.region
    }

    fn write(&mut self, local: IVec3, block: BlockType) {
        let index = self.index(local);
        self.blocks[index] = block;
    }
}

/// Records every write as a world-space `(position, block)` pair, in order.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordingSink {
    region: Region3,
    writes: Vec<(IVec3, BlockType)>,
}

impl RecordingSink {
    pub fn new(region: Region3) -> Self {
        Self {
            region,
            writes: Vec::new(),
        }
    }

    pub fn writes(&self) -> &[(IVec3, BlockType)] {
        &self.writes
    }

    pub fn into_writes(self) -> Vec<(IVec3, BlockType)> {
        self.writes
    }
}

impl BlockSink for RecordingSink {
    fn region(&self) -> Region3 {
        self.region
    }

    fn write(&mut self, local: IVec3, block: BlockType) {
        self.writes.push((self.region.min + local, block));
    }
}
