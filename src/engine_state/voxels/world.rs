//! # World Module
//!
//! This module provides [`WorldStore`], the concurrent map from chunk coordinates to
//! published chunk data. It is the single source of truth for voxel content.
//!
//! ## Concurrency
//!
//! The map sits behind a read-write lock. Workers meshing chunks take brief read locks to
//! clone out `Arc<ChunkData>` handles; workers publishing freshly generated chunks take
//! a brief write lock. A chunk is fully built before it is inserted, so no reader ever
//! observes a partially written chunk.
//!
//! There is no eviction: chunks stay resident for the lifetime of the store.

use std::{collections::HashMap, sync::Arc};

use cgmath::Point3;

use super::block::BlockSide;
use super::chunk::ChunkData;
use crate::core::MtResource;

/// Read-only access to published chunks.
///
/// Generation and meshing jobs receive one of these instead of holding a back-link to a
/// container, so they stay pure functions of (coordinate, store contents).
pub trait ChunkAccess {
    /// Returns the chunk at `position`, or `None` if it has not been published.
    fn chunk_at(&self, position: Point3<i32>) -> Option<Arc<ChunkData>>;

    /// Returns the six face-adjacent neighbours in [`BlockSide::all`] order.
    fn neighbors_of(&self, position: Point3<i32>) -> [Option<Arc<ChunkData>>; 6] {
        BlockSide::all().map(|side| self.chunk_at(position + side.neighbor_offset()))
    }
}

/// A shared, thread-safe map of published chunks. Cloning yields another handle to the
/// same store.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_streamer::engine_state::voxels::{chunk::ChunkData, world::WorldStore};
///
/// let world = WorldStore::new();
/// world.insert(Point3::new(0, 0, 0), ChunkData::new());
/// assert!(world.contains(Point3::new(0, 0, 0)));
/// ```
#[derive(Clone, Default)]
pub struct WorldStore {
    chunks: MtResource<HashMap<Point3<i32>, Arc<ChunkData>>>,
}

impl WorldStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        WorldStore {
            chunks: MtResource::new(HashMap::new()),
        }
    }

    /// Retrieves a shared handle to the chunk at `position`.
    pub fn get(&self, position: Point3<i32>) -> Option<Arc<ChunkData>> {
        self.chunks.get().get(&position).cloned()
    }

    /// Publishes a chunk. An existing chunk at the same position is replaced.
    pub fn insert(&self, position: Point3<i32>, chunk: ChunkData) -> Arc<ChunkData> {
        let chunk = Arc::new(chunk);
        self.chunks.get_mut().insert(position, chunk.clone());
        chunk
    }

    /// Whether a chunk has been published at `position`.
    pub fn contains(&self, position: Point3<i32>) -> bool {
        self.chunks.get().contains_key(&position)
    }

    /// Number of published chunks.
    pub fn len(&self) -> usize {
        self.chunks.get().len()
    }

    /// Whether no chunk has been published.
    pub fn is_empty(&self) -> bool {
        self.chunks.get().is_empty()
    }
}

impl ChunkAccess for WorldStore {
    fn chunk_at(&self, position: Point3<i32>) -> Option<Arc<ChunkData>> {
        self.get(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::BlockType;
    use std::thread;

    #[test]
    fn absent_chunks_are_none() {
        let world = WorldStore::new();
        assert!(world.get(Point3::new(1, 2, 3)).is_none());
        assert!(!world.contains(Point3::new(1, 2, 3)));
        assert!(world.is_empty());
    }

    #[test]
    fn second_insert_overwrites() {
        let world = WorldStore::new();
        let position = Point3::new(0, -1, 4);
        world.insert(position, ChunkData::filled(BlockType::DIRT.id()));
        world.insert(position, ChunkData::filled(BlockType::STONE.id()));

        assert_eq!(world.len(), 1);
        assert_eq!(world.get(position).unwrap().get(0, 0, 0), BlockType::STONE.id());
    }

    #[test]
    fn neighbors_follow_side_order() {
        let world = WorldStore::new();
        let origin = Point3::new(0, 0, 0);
        world.insert(origin + BlockSide::TOP.neighbor_offset(), ChunkData::new());

        let neighbors = world.neighbors_of(origin);
        for side in BlockSide::all() {
            assert_eq!(neighbors[side as usize].is_some(), side == BlockSide::TOP);
        }
    }

    #[test]
    fn concurrent_inserts_and_reads() {
        let world = WorldStore::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let world = world.clone();
                thread::spawn(move || {
                    for j in 0..32 {
                        let position = Point3::new(i, j, 0);
                        world.insert(position, ChunkData::filled(1));
                        assert!(world.get(position).is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(world.len(), 8 * 32);
    }
}
