//! Data module: ragged shapes
#![warn(missing_docs)]

pub mod ragged_shape;

pub use crate::debug_invariants::DebugInvariants;
pub use ragged_shape::RaggedShape;
