//! Background tasks for the rendering side of the pipeline.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: builds render and collision geometry for a chunk

pub mod chunk_mesh_generation_task;
