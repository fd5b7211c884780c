//! # Voxel Task System
//!
//! Background tasks that create voxel data.

pub mod chunk_generation_task;
