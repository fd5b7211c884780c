//! # Voxels
//!
//! Voxel data, storage and generation.
//!
//! ## Architecture
//!
//! * **Block**: block type ids, the named catalogue and face orientation
//! * **Chunk**: palette-compressed 16x16x16 voxel cubes
//! * **World**: the concurrent coordinate-to-chunk store
//! * **Generation**: terrain height, biome classification and foliage placement
//! * **Tasks**: the background job that generates and publishes a chunk
//!
//! ## Data Flow
//!
//! 1. The scheduler queues a chunk coordinate for generation
//! 2. A worker runs the generator and publishes the chunk to the world store
//! 3. Publication queues meshing for the chunk and its published neighbours
//!
//! ## Thread Safety
//!
//! Published chunks are immutable and shared behind `Arc`. The store itself is guarded
//! by a read-write lock, so many workers can read while one publishes.

pub mod block;
pub mod chunk;
pub mod generation;
pub mod tasks;
pub mod world;
