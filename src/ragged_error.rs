//! RaggedError: Unified error type for ragged-index public APIs
//!
//! Every fallible conversion in this crate reports through this type; no
//! public function panics on malformed input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a row-id was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowIdViolation {
    /// The value is not in `[0, num_rows)`.
    #[error("out of range for {num_rows} rows")]
    OutOfRange { num_rows: usize },
    /// The value is smaller than the row-id before it.
    #[error("smaller than preceding row id {previous}")]
    Decreasing { previous: u32 },
}

/// Why a row-splits array was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowSplitsViolation {
    /// The array has no entries; even zero rows needs `[0]`.
    #[error("row_splits is empty")]
    Empty,
    /// `row_splits[0]` is not zero.
    #[error("first split is {first}, expected 0")]
    NonZeroStart { first: u32 },
    /// `row_splits[index] < row_splits[index - 1]`.
    #[error("split {value} is smaller than preceding split {previous}")]
    Decreasing { previous: u32, value: u32 },
    /// A cached row-ids array expands to different splits.
    #[error("split {value} disagrees with cached row ids, which give {from_row_ids}")]
    CachedRowIdsMismatch { value: u32, from_row_ids: u32 },
}

/// Unified error type for ragged-index operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RaggedError {
    /// Caller-supplied output buffer has the wrong length.
    #[error("invalid shape: output buffer has length {found}, expected {expected}")]
    InvalidShape { expected: usize, found: usize },
    /// A row-id is out of range or breaks monotonicity.
    #[error("invalid row id {row_id} at index {index}: {violation}")]
    InvalidRowId {
        index: usize,
        row_id: u32,
        violation: RowIdViolation,
    },
    /// A row-splits array does not satisfy its invariants.
    #[error("invalid row_splits at index {index}: {violation}")]
    InvalidRowSplits {
        index: usize,
        violation: RowSplitsViolation,
    },
    /// An element count or index cannot be represented as `u32`.
    #[error("element count {len} does not fit in u32")]
    ElementCountOverflow { len: usize },
    /// Reserving an output buffer failed.
    #[error("failed to allocate output buffer of {requested} elements")]
    AllocationFailure { requested: usize },
}

