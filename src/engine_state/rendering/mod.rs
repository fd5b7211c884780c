//! Geometry side of the pipeline.
//!
//! Turns published chunks into render and collision geometry and defines the sinks that
//! geometry is delivered to.
//!
//! - [`meshing`]: greedy terrain meshing, foliage billboards and [`meshing::MeshJobResult`]
//! - [`tasks`]: the background mesh job
//! - [`texture`]: block face to texture layer mapping
//! - [`sinks`]: render and physics collaborators

pub mod meshing;
pub mod sinks;
pub mod tasks;
pub mod texture;
mod vertex;

// Re-export commonly used types
pub use vertex::Vertex;
