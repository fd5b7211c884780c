//! # Chunk Iteration Module
//!
//! An iterator over the non-air voxels of a chunk. Air voxels are skipped by looking at
//! the palette index alone.

use cgmath::Point3;

use super::{ChunkData, CHUNK_DIMENSION, CHUNK_PLANE_SIZE, CHUNK_SIZE};
use crate::engine_state::voxels::block::BlockTypeSize;

/// Yields `(position, block id)` for every non-air voxel in storage order.
pub struct ChunkBlockIterator<'a> {
    chunk_ref: &'a ChunkData,
    current_offset: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates an iterator positioned before the first voxel.
    pub fn new(chunk_ref: &'a ChunkData) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            current_offset: 0,
        }
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (Point3<usize>, BlockTypeSize);

    fn next(&mut self) -> Option<Self::Item> {
        let indices = self.chunk_ref.indices();
        while self.current_offset < CHUNK_SIZE as usize {
            let offset = self.current_offset;
            self.current_offset += 1;
            if indices[offset] == 0 {
                continue;
            }
            let offset_i32 = offset as i32;
            let position = Point3::new(
                (offset_i32 % CHUNK_DIMENSION) as usize,
                ((offset_i32 / CHUNK_DIMENSION) % CHUNK_DIMENSION) as usize,
                (offset_i32 / CHUNK_PLANE_SIZE) as usize,
            );
            return Some((position, self.chunk_ref.get_by_index(offset)));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_air_and_reports_positions() {
        let mut chunk = ChunkData::new();
        chunk.set(15, 0, 0, 3).unwrap();
        chunk.set(2, 5, 9, 8).unwrap();
        let blocks: Vec<_> = chunk.blocks().collect();
        assert_eq!(
            blocks,
            vec![(Point3::new(15, 0, 0), 3), (Point3::new(2, 5, 9), 8)]
        );
    }

    #[test]
    fn empty_chunk_yields_nothing() {
        assert_eq!(ChunkData::new().blocks().count(), 0);
    }
}
