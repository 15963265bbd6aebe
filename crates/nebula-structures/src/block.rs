//! Material tags written into the voxel output.

use std::fmt;

/// A voxel material. `Air` is zero so a zeroed buffer is empty space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum BlockType {
    #[default]
    Air = 0,
    Stone,
    Dirt,
    Grass,
    Sand,
    Water,
    Gravel,
    Cobblestone,
    Planks,
    Log,
    Glass,
    RoofTile,
    Thatch,
}

impl BlockType {
    pub const ALL: [BlockType; 13] = [
        BlockType::Air,
        BlockType::Stone,
        BlockType::Dirt,
        BlockType::Grass,
        BlockType::Sand,
        BlockType::Water,
        BlockType::Gravel,
        BlockType::Cobblestone,
        BlockType::Planks,
        BlockType::Log,
        BlockType::Glass,
        BlockType::RoofTile,
        BlockType::Thatch,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BlockType::Air => "air",
            BlockType::Stone => "stone",
            BlockType::Dirt => "dirt",
            BlockType::Grass => "grass",
            BlockType::Sand => "sand",
            BlockType::Water => "water",
            BlockType::Gravel => "gravel",
            BlockType::Cobblestone => "cobblestone",
            BlockType::Planks => "planks",
            BlockType::Log => "log",
            BlockType::Glass => "glass",
            BlockType::RoofTile => "roof_tile",
            BlockType::Thatch => "thatch",
        }
    }

    /// Whether entities collide with this block.
    pub fn is_solid(&self) -> bool {
        !matches!(self, BlockType::Air | BlockType::Water)
    }

    pub fn id(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
