#![cfg_attr(docsrs, feature(doc_cfg))]
//! # ragged-index
//!
//! ragged-index provides the index primitives underneath ragged (variable-length)
//! array processing: converting between the per-element row-ids and the CSR-style
//! row-splits encodings of a ragged axis, and compacting indices under a boolean
//! keep mask.
//!
//! ## Features
//! - Row-ids → row-splits conversion with range and monotonicity checks fused into
//!   the single pass, plus the inverse expansion
//! - Mask compaction producing the new2old index mapping
//! - A single-level [`RaggedShape`](data::RaggedShape) value type with a lazily
//!   cached row-ids array
//! - Optional Rayon-backed `par_*` variants (feature `rayon`)
//!
//! ## Determinism
//!
//! Every operation is a pure function of its input. The parallel variants return
//! results, and errors, identical to the sequential ones.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! ragged-index = "0.1.0"
//! # Optional features:
//! # features = ["rayon", "check-invariants"]
//! ```
//!
//! ```rust
//! # fn try_main() -> Result<(), ragged_index::ragged_error::RaggedError> {
//! use ragged_index::prelude::*;
//!
//! let mut row_splits = [0u32; 4];
//! row_ids_to_row_splits(&[0, 0, 2, 2], &mut row_splits)?;
//! assert_eq!(row_splits, [0, 2, 2, 4]);
//!
//! let new2old = get_new2old(&[false, false, true, false, true, false, true, true])?;
//! assert_eq!(new2old, vec![2, 4, 6, 7]);
//! # Ok(())
//! # }
//! # try_main().unwrap();
//! ```

pub mod algs;
pub mod data;
pub mod debug_invariants;
pub mod ragged_error;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used functions & types:
pub mod prelude {
    pub use crate::algs::{
        compact_indices, convert_row_ids_to_row_splits, fill_row_ids, fill_row_splits,
        get_new2old, row_ids_to_row_splits, row_splits_to_row_ids, validate_row_splits,
    };
    #[cfg(feature = "rayon")]
    pub use crate::algs::{
        par_compact_indices, par_convert_row_ids_to_row_splits, par_fill_row_splits,
    };
    pub use crate::data::RaggedShape;
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::ragged_error::{RaggedError, RowIdViolation, RowSplitsViolation};
}
