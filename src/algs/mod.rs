//! Re-export public algorithms.

pub mod compact;
pub mod row_splits;

pub use compact::{compact_indices, get_new2old};
pub use row_splits::{
    convert_row_ids_to_row_splits, fill_row_ids, fill_row_splits, row_ids_to_row_splits,
    row_splits_to_row_ids, validate_row_splits,
};
#[cfg(feature = "rayon")]
pub use compact::par_compact_indices;
#[cfg(feature = "rayon")]
pub use row_splits::{par_convert_row_ids_to_row_splits, par_fill_row_splits};

use crate::ragged_error::RaggedError;

// Row ids and offsets are stored as u32 and used directly as slice indices.
static_assertions::const_assert!(usize::BITS >= u32::BITS);

/// Narrow an element count to `u32`, the storage type of offsets and indices.
#[inline]
pub(crate) fn checked_u32(len: usize) -> Result<u32, RaggedError> {
    u32::try_from(len).map_err(|_| RaggedError::ElementCountOverflow { len })
}
