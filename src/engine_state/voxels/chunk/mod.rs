//! # Chunk Module
//!
//! This module provides [`ChunkData`], the 16x16x16 cube of voxels that is the unit of
//! generation, storage and meshing.
//!
//! ## Palette Compression
//!
//! A chunk stores:
//! - `palette`: the distinct block type ids present, in first-seen order. Entry 0 is
//!   always air.
//! - `indices`: one `u8` per voxel pointing into the palette.
//!
//! Index 0 means air and nothing else, so solidity checks never touch the palette. A
//! chunk can hold air plus up to 255 other block types; a write that would need a 257th
//! palette entry is rejected.
//!
//! Voxels are laid out x-fastest, then y, then z: `x + 16 * y + 256 * z`.

use log::warn;

use super::block::{BlockTypeSize, AIR};
use super::generation::foliage::FoliagePlacement;
use crate::engine_state::error::{VoxelError, VoxelResult};

mod chunk_creation;
pub mod chunk_iteration;

pub use chunk_creation::ChunkBuilder;
pub use chunk_iteration::ChunkBlockIterator;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;
/// The dimension of a chunk including an extra layer of blocks on each side for neighbor lookups.
pub const CHUNK_DIMENSION_WRAPPED: usize = (CHUNK_DIMENSION + 2) as usize;
/// The number of blocks in a wrapped 2D chunk plane.
pub const CHUNK_PLANE_SIZE_WRAPPED: usize = CHUNK_DIMENSION_WRAPPED * CHUNK_DIMENSION_WRAPPED;
/// The total number of blocks in a wrapped chunk.
pub const CHUNK_SIZE_WRAPPED: usize = CHUNK_PLANE_SIZE_WRAPPED * CHUNK_DIMENSION_WRAPPED;
/// Largest palette a chunk may hold: air plus 255 other block types.
pub const MAX_PALETTE_LEN: usize = u8::MAX as usize + 1;

/// A palette-compressed 16x16x16 cube of voxels.
///
/// Once published to the [`WorldStore`](super::world::WorldStore) a chunk is shared
/// behind an `Arc` and never modified again.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkData {
    palette: Vec<BlockTypeSize>,
    indices: Box<[u8]>,
    foliage: Vec<FoliagePlacement>,
}

impl Default for ChunkData {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkData {
    /// Creates a chunk where every voxel is air.
    pub fn new() -> Self {
        ChunkData {
            palette: vec![AIR],
            indices: vec![0u8; CHUNK_SIZE as usize].into_boxed_slice(),
            foliage: Vec::new(),
        }
    }

    /// Creates a chunk with every voxel set to `block`.
    pub fn filled(block: BlockTypeSize) -> Self {
        let mut chunk = Self::new();
        if block != AIR {
            chunk.palette.push(block);
            chunk.indices.fill(1);
        }
        chunk
    }

    /// Builds a chunk from a dense buffer of block ids in `x + 16y + 256z` order.
    ///
    /// Buffers of the wrong length and buffers with too many distinct block types are
    /// rejected.
    pub fn from_block_ids(blocks: &[BlockTypeSize]) -> VoxelResult<Self> {
        if blocks.len() != CHUNK_SIZE as usize {
            return Err(malformed(VoxelError::MalformedBuffer {
                expected: CHUNK_SIZE as usize,
                actual: blocks.len(),
            }));
        }

        let mut chunk = Self::new();
        for (index, block) in blocks.iter().enumerate() {
            chunk.indices[index] = chunk.palette_index_for(*block)?;
        }
        Ok(chunk)
    }

    /// Builds a chunk from an existing palette and per-voxel index buffer.
    ///
    /// The palette must start with air, contain no duplicates, and fit in
    /// [`MAX_PALETTE_LEN`]; every index must point into it.
    pub fn from_parts(palette: Vec<BlockTypeSize>, indices: Vec<u8>) -> VoxelResult<Self> {
        if indices.len() != CHUNK_SIZE as usize {
            return Err(malformed(VoxelError::MalformedBuffer {
                expected: CHUNK_SIZE as usize,
                actual: indices.len(),
            }));
        }
        match palette.first() {
            Some(&first) if first == AIR => {}
            Some(_) => return Err(malformed(VoxelError::InvalidPalette("entry 0 must be air"))),
            None => return Err(malformed(VoxelError::InvalidPalette("palette is empty"))),
        }
        if palette.len() > MAX_PALETTE_LEN {
            return Err(malformed(VoxelError::InvalidPalette("palette exceeds 256 entries")));
        }
        for (i, block) in palette.iter().enumerate() {
            if palette[..i].contains(block) {
                return Err(malformed(VoxelError::InvalidPalette("duplicate block type")));
            }
        }
        if let Some(&index) = indices.iter().find(|&&index| index as usize >= palette.len()) {
            return Err(malformed(VoxelError::InvalidPaletteIndex {
                index,
                palette_len: palette.len(),
            }));
        }

        Ok(ChunkData {
            palette,
            indices: indices.into_boxed_slice(),
            foliage: Vec::new(),
        })
    }

    /// Flat voxel index for chunk-local coordinates, or `None` if out of range.
    pub fn index_of(x: i32, y: i32, z: i32) -> Option<usize> {
        let range = 0..CHUNK_DIMENSION;
        if range.contains(&x) && range.contains(&y) && range.contains(&z) {
            Some((x + CHUNK_DIMENSION * y + CHUNK_PLANE_SIZE * z) as usize)
        } else {
            None
        }
    }

    /// Block id at chunk-local coordinates. Out-of-range positions read as air.
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockTypeSize {
        match Self::index_of(x, y, z) {
            Some(index) => self.palette[self.indices[index] as usize],
            None => AIR,
        }
    }

    /// Block id at a flat voxel index. Callers guarantee `index < CHUNK_SIZE`.
    pub(crate) fn get_by_index(&self, index: usize) -> BlockTypeSize {
        self.palette[self.indices[index] as usize]
    }

    /// Whether the voxel at chunk-local coordinates is solid. Out-of-range reads as empty.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        match Self::index_of(x, y, z) {
            Some(index) => self.indices[index] != 0,
            None => false,
        }
    }

    /// Writes a block id at chunk-local coordinates.
    ///
    /// Writing a new block type grows the palette; palette entries are never reclaimed.
    pub fn set(&mut self, x: i32, y: i32, z: i32, block: BlockTypeSize) -> VoxelResult<()> {
        let index = Self::index_of(x, y, z).ok_or(VoxelError::OutOfBounds { x, y, z })?;
        let palette_index = self.palette_index_for(block)?;
        self.indices[index] = palette_index;
        Ok(())
    }

    /// Like [`ChunkData::set`] but logs and ignores a rejected write.
    pub fn set_or_warn(&mut self, x: i32, y: i32, z: i32, block: BlockTypeSize) -> bool {
        match self.set(x, y, z, block) {
            Ok(()) => true,
            Err(err) => {
                warn!("Rejected voxel write at ({x}, {y}, {z}): {err}");
                false
            }
        }
    }

    fn palette_index_for(&mut self, block: BlockTypeSize) -> VoxelResult<u8> {
        if block == AIR {
            return Ok(0);
        }
        if let Some(position) = self.palette.iter().position(|&entry| entry == block) {
            return Ok(position as u8);
        }
        if self.palette.len() >= MAX_PALETTE_LEN {
            return Err(VoxelError::PaletteOverflow { block });
        }
        self.palette.push(block);
        Ok((self.palette.len() - 1) as u8)
    }

    /// The palette, air first.
    pub fn palette(&self) -> &[BlockTypeSize] {
        &self.palette
    }

    /// Raw per-voxel palette indices.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Whether every voxel is air.
    pub fn is_empty(&self) -> bool {
        self.indices.iter().all(|&index| index == 0)
    }

    /// Number of solid voxels.
    pub fn solid_count(&self) -> usize {
        self.indices.iter().filter(|&&index| index != 0).count()
    }

    /// Foliage placements attached at generation time.
    pub fn foliage(&self) -> &[FoliagePlacement] {
        &self.foliage
    }

    /// Attaches a foliage placement. Placements outside the chunk are ignored.
    pub fn add_foliage(&mut self, placement: FoliagePlacement) {
        let p = placement.position;
        if Self::index_of(p.x as i32, p.y as i32, p.z as i32).is_some() {
            self.foliage.push(placement);
        }
    }

    /// Iterates over every non-air voxel.
    pub fn blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }
}

fn malformed(err: VoxelError) -> VoxelError {
    warn!("Rejected voxel buffer: {err}");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{block::BlockType, generation::foliage::FoliageType};
    use cgmath::Point3;
    use proptest::prelude::*;

    #[test]
    fn new_chunk_is_all_air() {
        let chunk = ChunkData::new();
        assert!(chunk.is_empty());
        assert_eq!(chunk.palette(), &[AIR]);
        assert_eq!(chunk.get(3, 4, 5), AIR);
    }

    #[test]
    fn out_of_range_reads_are_air() {
        let chunk = ChunkData::filled(BlockType::STONE.id());
        assert_eq!(chunk.get(-1, 0, 0), AIR);
        assert_eq!(chunk.get(0, 16, 0), AIR);
        assert_eq!(chunk.get(0, 0, i32::MAX), AIR);
        assert!(!chunk.is_solid(16, 16, 16));
    }

    #[test]
    fn out_of_range_writes_are_rejected() {
        let mut chunk = ChunkData::new();
        assert!(matches!(
            chunk.set(16, 0, 0, BlockType::DIRT.id()),
            Err(VoxelError::OutOfBounds { x: 16, .. })
        ));
        assert!(!chunk.set_or_warn(0, -1, 0, BlockType::DIRT.id()));
        assert!(chunk.is_empty());
    }

    #[test]
    fn uniform_fill_has_two_palette_entries() {
        let mut chunk = ChunkData::new();
        for z in 0..CHUNK_DIMENSION {
            for y in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    chunk.set(x, y, z, BlockType::GRASS.id()).unwrap();
                }
            }
        }
        assert_eq!(chunk.palette().len(), 2);
        assert_eq!(chunk, ChunkData::filled(BlockType::GRASS.id()));
    }

    #[test]
    fn palette_overflow_rejects_the_write() {
        let mut chunk = ChunkData::new();
        for id in 1..=255u16 {
            let index = id as i32 - 1;
            chunk.set(index % 16, index / 16, 0, id).unwrap();
        }
        assert_eq!(chunk.palette().len(), MAX_PALETTE_LEN);

        let result = chunk.set(0, 0, 1, 1000);
        assert!(matches!(result, Err(VoxelError::PaletteOverflow { block: 1000 })));
        assert_eq!(chunk.get(0, 0, 1), AIR);

        // Existing types are still writable.
        chunk.set(0, 0, 1, 7).unwrap();
        assert_eq!(chunk.get(0, 0, 1), 7);
    }

    #[test]
    fn later_write_replaces_earlier() {
        let mut chunk = ChunkData::new();
        chunk.set(1, 2, 3, BlockType::SAND.id()).unwrap();
        chunk.set(1, 2, 3, BlockType::SNOW.id()).unwrap();
        assert_eq!(chunk.get(1, 2, 3), BlockType::SNOW.id());
        chunk.set(1, 2, 3, AIR).unwrap();
        assert!(chunk.is_empty());
    }

    #[test]
    fn dense_buffer_of_wrong_length_is_rejected() {
        let result = ChunkData::from_block_ids(&[1, 2, 3]);
        assert!(matches!(
            result,
            Err(VoxelError::MalformedBuffer { expected: 4096, actual: 3 })
        ));
    }

    #[test]
    fn malformed_parts_are_rejected() {
        let zeros = vec![0u8; CHUNK_SIZE as usize];
        assert!(ChunkData::from_parts(vec![], zeros.clone()).is_err());
        assert!(ChunkData::from_parts(vec![3], zeros.clone()).is_err());
        assert!(ChunkData::from_parts(vec![AIR, 3, 3], zeros.clone()).is_err());

        let mut bad_index = zeros.clone();
        bad_index[10] = 2;
        assert!(matches!(
            ChunkData::from_parts(vec![AIR, 3], bad_index),
            Err(VoxelError::InvalidPaletteIndex { index: 2, palette_len: 2 })
        ));

        let mut good = zeros;
        good[10] = 1;
        let chunk = ChunkData::from_parts(vec![AIR, 3], good).unwrap();
        assert_eq!(chunk.get(10, 0, 0), 3);
    }

    #[test]
    fn foliage_outside_the_chunk_is_ignored() {
        let mut chunk = ChunkData::new();
        chunk.add_foliage(FoliagePlacement {
            position: Point3::new(1, 2, 3),
            foliage: FoliageType::TallGrass,
        });
        chunk.add_foliage(FoliagePlacement {
            position: Point3::new(16, 2, 3),
            foliage: FoliageType::TallGrass,
        });
        assert_eq!(chunk.foliage().len(), 1);
    }

    proptest! {
        #[test]
        fn set_then_get_returns_the_block(
            x in 0..CHUNK_DIMENSION,
            y in 0..CHUNK_DIMENSION,
            z in 0..CHUNK_DIMENSION,
            block in 0u16..255,
        ) {
            let mut chunk = ChunkData::new();
            chunk.set(x, y, z, block).unwrap();
            prop_assert_eq!(chunk.get(x, y, z), block);
            prop_assert_eq!(chunk.is_solid(x, y, z), block != AIR);
        }

        #[test]
        fn palette_counts_distinct_types(k in 0usize..=254) {
            let mut chunk = ChunkData::new();
            for i in 0..k {
                let slot = i as i32;
                chunk.set(slot % 16, slot / 16, 0, (i + 1) as BlockTypeSize).unwrap();
            }
            prop_assert_eq!(chunk.palette().len(), k + 1);
        }
    }
}
