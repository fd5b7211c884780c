//! # Chunk Creation Module
//!
//! A sequential builder that fills a chunk voxel by voxel in storage order
//! (x fastest, then y, then z). Generation produces voxels in exactly this order, so the
//! builder never has to compute coordinates.

use log::warn;

use super::{ChunkData, CHUNK_DIMENSION};
use crate::engine_state::voxels::{block::BlockTypeSize, generation::foliage::FoliagePlacement};

/// Fills a [`ChunkData`] in storage order.
pub struct ChunkBuilder {
    chunk: ChunkData,
    local_x: i32,
    local_y: i32,
    local_z: i32,
    rejected_writes: usize,
}

impl Default for ChunkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkBuilder {
    /// Creates a builder positioned at voxel (0, 0, 0) of an empty chunk.
    pub fn new() -> Self {
        ChunkBuilder {
            chunk: ChunkData::new(),
            local_x: 0,
            local_y: 0,
            local_z: 0,
            rejected_writes: 0,
        }
    }

    /// Writes the block at the current position and advances.
    ///
    /// Pushing past the last voxel is ignored. A write rejected by the palette leaves the
    /// voxel as air.
    pub fn push_block_type(&mut self, block: BlockTypeSize) {
        if self.local_z >= CHUNK_DIMENSION {
            warn!("Chunk builder is already full, dropping block {block}");
            return;
        }

        if let Err(err) = self
            .chunk
            .set(self.local_x, self.local_y, self.local_z, block)
        {
            warn!(
                "Rejected voxel write at ({}, {}, {}): {err}",
                self.local_x, self.local_y, self.local_z
            );
            self.rejected_writes += 1;
        }

        self.local_x += 1;
        if self.local_x == CHUNK_DIMENSION {
            self.local_x = 0;
            self.local_y += 1;
            if self.local_y == CHUNK_DIMENSION {
                self.local_y = 0;
                self.local_z += 1;
            }
        }
    }

    /// Attaches a foliage placement to the chunk being built.
    pub fn push_foliage(&mut self, placement: FoliagePlacement) {
        self.chunk.add_foliage(placement);
    }

    /// Number of writes the palette rejected so far.
    pub fn rejected_writes(&self) -> usize {
        self.rejected_writes
    }

    /// Finalizes the chunk. Voxels never pushed stay air.
    pub fn return_chunk(self) -> ChunkData {
        self.chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::CHUNK_SIZE;

    #[test]
    fn pushes_follow_storage_order() {
        let mut builder = ChunkBuilder::new();
        for i in 0..CHUNK_SIZE {
            builder.push_block_type(if i % 17 == 0 { 4 } else { 0 });
        }
        assert_eq!(builder.rejected_writes(), 0);
        let chunk = builder.return_chunk();
        assert_eq!(chunk.get(0, 0, 0), 4);
        assert_eq!(chunk.get(1, 1, 0), 4); // index 17
        assert_eq!(chunk.get(1, 0, 0), 0);
    }

    #[test]
    fn palette_overflow_is_counted_and_left_as_air() {
        let mut builder = ChunkBuilder::new();
        for id in 1..=300u16 {
            builder.push_block_type(id);
        }
        assert_eq!(builder.rejected_writes(), 45);
        let chunk = builder.return_chunk();
        assert_eq!(chunk.solid_count(), 255);
        assert_eq!(chunk.get(255 % 16, 255 / 16, 0), 0);
    }

    #[test]
    fn extra_pushes_are_ignored() {
        let mut builder = ChunkBuilder::new();
        for _ in 0..CHUNK_SIZE + 5 {
            builder.push_block_type(2);
        }
        let chunk = builder.return_chunk();
        assert_eq!(chunk.solid_count(), CHUNK_SIZE as usize);
    }
}
