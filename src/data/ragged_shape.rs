//! RaggedShape: one ragged axis over a flat element array.
//!
//! A `RaggedShape` owns a validated row-splits array and lazily derives the
//! matching row-ids the first time they are requested. It describes a single
//! level only; nesting shapes is out of scope.

use std::ops::Range;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::algs::compact::compact_indices;
use crate::algs::row_splits::{
    alloc_zeroed, convert_row_ids_to_row_splits, expand_validated, validate_row_splits,
};
use crate::debug_invariants::DebugInvariants;
use crate::ragged_error::{RaggedError, RowSplitsViolation};

/// `RaggedShape` maintains:
/// - `row_splits`, the CSR offsets of each row (length `num_rows + 1`),
/// - a cached `row_ids` array, filled on first use.
///
/// # Invariants
///
/// - `row_splits` is non-empty, starts at 0 and is non-decreasing.
/// - When cached, `row_ids` has length `num_elems` and expands `row_splits`.
///
/// These invariants are checked after construction in debug builds and when
/// the `check-invariants` feature is enabled. They can also be verified
/// manually via [`validate_invariants`](DebugInvariants::validate_invariants).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RaggedShapeRepr", into = "RaggedShapeRepr")]
pub struct RaggedShape {
    row_splits: Vec<u32>,
    row_ids: OnceCell<Vec<u32>>,
}

/// Serialized form; only the splits are persisted.
#[derive(Serialize, Deserialize)]
struct RaggedShapeRepr {
    row_splits: Vec<u32>,
}

impl TryFrom<RaggedShapeRepr> for RaggedShape {
    type Error = RaggedError;

    fn try_from(repr: RaggedShapeRepr) -> Result<Self, Self::Error> {
        RaggedShape::from_row_splits(repr.row_splits)
    }
}

impl From<RaggedShape> for RaggedShapeRepr {
    fn from(shape: RaggedShape) -> Self {
        RaggedShapeRepr {
            row_splits: shape.row_splits,
        }
    }
}

impl PartialEq for RaggedShape {
    fn eq(&self, other: &Self) -> bool {
        self.row_splits == other.row_splits
    }
}

impl Eq for RaggedShape {}

impl RaggedShape {
    /// Build a shape from CSR offsets.
    ///
    /// # Errors
    /// Returns `Err(InvalidRowSplits)` if `row_splits` is empty, does not
    /// start at 0, or decreases.
    ///
    /// # Example
    /// ```rust
    /// # fn try_main() -> Result<(), ragged_index::ragged_error::RaggedError> {
    /// use ragged_index::data::RaggedShape;
    /// let shape = RaggedShape::from_row_splits(vec![0, 2, 2, 4])?;
    /// assert_eq!(shape.num_rows(), 3);
    /// assert_eq!(shape.row_ids(), &[0, 0, 2, 2]);
    /// # Ok(())
    /// # }
    /// # try_main().unwrap();
    /// ```
    pub fn from_row_splits(row_splits: Vec<u32>) -> Result<Self, RaggedError> {
        validate_row_splits(&row_splits)?;
        let shape = Self {
            row_splits,
            row_ids: OnceCell::new(),
        };
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        shape.debug_assert_invariants();
        Ok(shape)
    }

    /// Build a shape from a non-decreasing row-ids array over `num_rows` rows.
    ///
    /// The row-ids are kept as the cached expansion.
    ///
    /// # Errors
    /// As [`convert_row_ids_to_row_splits`].
    pub fn from_row_ids(row_ids: &[u32], num_rows: usize) -> Result<Self, RaggedError> {
        let row_splits = convert_row_ids_to_row_splits(row_ids, num_rows)?;
        let shape = Self {
            row_splits,
            row_ids: OnceCell::with_value(row_ids.to_vec()),
        };
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        shape.debug_assert_invariants();
        Ok(shape)
    }

    /// Number of rows.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.row_splits.len() - 1
    }

    /// Number of elements across all rows.
    #[inline]
    pub fn num_elems(&self) -> usize {
        self.row_splits.last().map_or(0, |&n| n as usize)
    }

    /// CSR offsets, length `num_rows() + 1`.
    #[inline]
    pub fn row_splits(&self) -> &[u32] {
        &self.row_splits
    }

    /// Owning row of each element, computed once and cached.
    ///
    /// # Complexity
    /// **O(num_elems + num_rows)** on first call, **O(1)** afterwards.
    pub fn row_ids(&self) -> &[u32] {
        self.row_ids.get_or_init(|| {
            let mut row_ids = vec![0; self.num_elems()];
            expand_validated(&self.row_splits, &mut row_ids);
            row_ids
        })
    }

    /// Element range of row `r`, or `None` if `r >= num_rows()`.
    #[inline]
    pub fn row_range(&self, r: usize) -> Option<Range<usize>> {
        let start = *self.row_splits.get(r)? as usize;
        let end = *self.row_splits.get(r.checked_add(1)?)? as usize;
        Some(start..end)
    }

    /// Number of elements in row `r`, or `None` if `r >= num_rows()`.
    #[inline]
    pub fn row_len(&self, r: usize) -> Option<usize> {
        self.row_range(r).map(|range| range.len())
    }

    /// Iterator over the element range of every row, in row order.
    pub fn row_ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.row_splits
            .windows(2)
            .map(|w| w[0] as usize..w[1] as usize)
    }

    /// Drop every element whose `keep` entry is false.
    ///
    /// Returns the filtered shape, which keeps all `num_rows()` rows (some
    /// possibly emptied), together with the new2old mapping from surviving
    /// elements to their original positions.
    ///
    /// # Errors
    /// Returns `Err(InvalidShape)` if `keep.len() != num_elems()`, or any
    /// error from [`compact_indices`].
    pub fn compact(&self, keep: &[bool]) -> Result<(RaggedShape, Vec<u32>), RaggedError> {
        if keep.len() != self.num_elems() {
            return Err(RaggedError::InvalidShape {
                expected: self.num_elems(),
                found: keep.len(),
            });
        }
        let new2old = compact_indices(keep)?;
        let row_ids = self.row_ids();
        let mut new_row_ids = alloc_zeroed(new2old.len())?;
        for (dst, &old) in new_row_ids.iter_mut().zip(&new2old) {
            *dst = row_ids[old as usize];
        }
        let shape = RaggedShape::from_row_ids(&new_row_ids, self.num_rows())?;
        Ok((shape, new2old))
    }
}

impl DebugInvariants for RaggedShape {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "RaggedShape");
    }

    fn validate_invariants(&self) -> Result<(), RaggedError> {
        validate_row_splits(&self.row_splits)?;
        if let Some(row_ids) = self.row_ids.get() {
            let expected = convert_row_ids_to_row_splits(row_ids, self.num_rows())?;
            if let Some(index) = expected
                .iter()
                .zip(&self.row_splits)
                .position(|(a, b)| a != b)
            {
                return Err(RaggedError::InvalidRowSplits {
                    index,
                    violation: RowSplitsViolation::CachedRowIdsMismatch {
                        value: self.row_splits[index],
                        from_row_ids: expected[index],
                    },
                });
            }
        }
        Ok(())
    }
}
