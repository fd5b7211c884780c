//! # Block Module
//!
//! Block identifiers, the named block catalogue and block face orientation.
//!
//! Chunks store raw [`BlockTypeSize`] ids so content outside the named catalogue is still
//! representable; [`BlockType`] gives the ids the generator and material table know about.

pub mod block_side;
pub mod block_type;

pub use block_side::BlockSide;
pub use block_type::BlockType;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u16;

/// The raw id of the empty block.
pub const AIR: BlockTypeSize = BlockType::AIR as BlockTypeSize;
