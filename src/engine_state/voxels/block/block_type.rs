//! # Block Type Module
//!
//! This module defines the named block types of the voxel world and the conversion
//! from raw stored ids.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates the block types the generator and the default material table know about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Always palette entry 0.
    AIR = 0,
    /// Plain dirt.
    DIRT = 1,
    /// Grass-topped dirt.
    GRASS = 2,
    /// Bare rock; the usual deep block.
    STONE = 3,
    /// Loose sand.
    SAND = 4,
    /// Compressed sand found under deserts.
    SANDSTONE = 5,
    /// Packed snow.
    SNOW = 6,
    /// Loose gravel.
    GRAVEL = 7,
    /// Needle-covered forest floor.
    PODZOL = 8,
    /// Waterlogged soil.
    MUD = 9,
    /// Dense clay.
    CLAY = 10,
    /// Moss-covered soil.
    MOSS = 11,
}

impl BlockType {
    /// Number of named block types.
    pub const COUNT: usize = 12;

    /// Converts a stored id to a named block type, if it is one.
    pub fn from_id(id: BlockTypeSize) -> Option<Self> {
        FromPrimitive::from_u16(id)
    }

    /// The stored id of this block type.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_the_catalogue() {
        for id in 0..BlockType::COUNT as BlockTypeSize {
            let block = BlockType::from_id(id).unwrap();
            assert_eq!(block.id(), id);
        }
        assert_eq!(BlockType::from_id(BlockType::COUNT as BlockTypeSize), None);
    }
}
