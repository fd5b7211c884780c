//! Mesh generation for voxel rendering.
//!
//! This module converts voxel data into indexed, GPU-friendly geometry.
//!
//! # Architecture
//! - [`RenderGeometry`]: vertices and indices for one kind of geometry
//! - [`Quad`]: a merged rectangle of faces found by the greedy mesher
//! - [`GreedyMesher`]: terrain surface extraction with face merging
//! - [`mesh_foliage`]: crossed-quad billboards for foliage placements
//!
//! # Usage
//! ```
//! use voxel_streamer::engine_state::{
//!     rendering::{meshing::mesh::GreedyMesher, texture::BlockTextureTable},
//!     voxels::chunk::ChunkData,
//! };
//!
//! let mut chunk = ChunkData::new();
//! chunk.set(0, 0, 0, 3).unwrap();
//! let neighbors = [None, None, None, None, None, None];
//! let mesh = GreedyMesher::new(&chunk, &neighbors).mesh(&BlockTextureTable::default());
//! assert_eq!(mesh.geometry.quad_count(), 6);
//! ```

mod face;
mod foliage;
mod greedy;
mod mesh;

pub use face::Quad;
pub use foliage::mesh_foliage;
pub use greedy::{GreedyMesh, GreedyMesher};
pub use mesh::RenderGeometry;
