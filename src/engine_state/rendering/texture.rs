//! Block-type to texture-layer mapping.
//!
//! The mesher never hard-codes texture layers; it asks a [`MaterialProvider`] for the
//! layer of each (block type, face) pair it emits. [`BlockTextureTable`] is the default
//! provider, backed by a per-side table for the named block catalogue.

use crate::engine_state::voxels::block::{BlockSide, BlockType, BlockTypeSize};

/// Supplies the texture-array layer for a block face.
pub trait MaterialProvider: Send + Sync {
    /// The texture layer to use for `side` of blocks with id `block`.
    fn texture_layer(&self, block: BlockTypeSize, side: BlockSide) -> u32;
}

/// Texture layers per block type, in [`BlockSide::all`] order
/// (front, back, bottom, top, left, right).
pub static BLOCK_TYPE_TO_TEXTURE_INDICES: [[u32; 6]; BlockType::COUNT] = [
    // AIR
    [0, 0, 0, 0, 0, 0],
    // DIRT
    [1, 1, 1, 1, 1, 1],
    // GRASS
    [2, 2, 1, 3, 2, 2],
    // STONE
    [4, 4, 4, 4, 4, 4],
    // SAND
    [5, 5, 5, 5, 5, 5],
    // SANDSTONE
    [6, 6, 6, 6, 6, 6],
    // SNOW
    [7, 7, 7, 7, 7, 7],
    // GRAVEL
    [8, 8, 8, 8, 8, 8],
    // PODZOL
    [9, 9, 1, 10, 9, 9],
    // MUD
    [11, 11, 11, 11, 11, 11],
    // CLAY
    [12, 12, 12, 12, 12, 12],
    // MOSS
    [13, 13, 13, 13, 13, 13],
];

/// Table-driven [`MaterialProvider`]. Ids without an entry map to layer 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockTextureTable {
    layers: Vec<[u32; 6]>,
}

impl Default for BlockTextureTable {
    fn default() -> Self {
        BlockTextureTable {
            layers: BLOCK_TYPE_TO_TEXTURE_INDICES.to_vec(),
        }
    }
}

impl BlockTextureTable {
    /// Sets the layer used for every side of `block`, growing the table if needed.
    pub fn set_all_sides(&mut self, block: BlockTypeSize, layer: u32) {
        let index = block as usize;
        if self.layers.len() <= index {
            self.layers.resize(index + 1, [0; 6]);
        }
        self.layers[index] = [layer; 6];
    }
}

impl MaterialProvider for BlockTextureTable {
    fn texture_layer(&self, block: BlockTypeSize, side: BlockSide) -> u32 {
        self.layers
            .get(block as usize)
            .map_or(0, |sides| sides[side as usize])
    }
}
