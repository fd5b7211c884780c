//! # Error Types
//!
//! Every fallible operation in the streamer reports a [`VoxelError`]. Errors never cross
//! the worker/main-thread boundary: workers log them and drop the affected item.

use thiserror::Error;

use super::voxels::block::BlockTypeSize;

/// Convenience alias used by fallible streamer operations.
pub type VoxelResult<T> = Result<T, VoxelError>;

/// Errors raised by voxel storage, configuration and the worker pool.
#[derive(Debug, Error)]
pub enum VoxelError {
    /// A voxel write addressed a position outside the chunk cube.
    #[error("voxel position ({x}, {y}, {z}) is outside the chunk")]
    OutOfBounds {
        /// Chunk-local x coordinate.
        x: i32,
        /// Chunk-local y coordinate.
        y: i32,
        /// Chunk-local z coordinate.
        z: i32,
    },

    /// A chunk already holds the maximum number of distinct block types.
    #[error("palette is full, block type {block} rejected")]
    PaletteOverflow {
        /// The block type id that could not be added.
        block: BlockTypeSize,
    },

    /// A dense voxel buffer did not have one entry per voxel.
    #[error("voxel buffer holds {actual} entries, expected {expected}")]
    MalformedBuffer {
        /// Required entry count.
        expected: usize,
        /// Entry count that was supplied.
        actual: usize,
    },

    /// A palette was empty, did not start with air, or repeated a block type.
    #[error("invalid palette: {0}")]
    InvalidPalette(&'static str),

    /// A voxel referenced a palette slot that does not exist.
    #[error("palette index {index} out of range for palette of {palette_len}")]
    InvalidPaletteIndex {
        /// The offending index.
        index: u8,
        /// Length of the palette it was checked against.
        palette_len: usize,
    },

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration could not be read.
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// A background worker thread could not be started.
    #[error("failed to spawn worker {index}: {source}")]
    WorkerSpawn {
        /// Index of the worker that failed.
        index: usize,
        /// Underlying OS error.
        source: std::io::Error,
    },
}
