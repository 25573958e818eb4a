//! Conversion between the row-ids and row-splits encodings of a ragged axis.
//!
//! A partition of `num_elems` elements into `num_rows` contiguous rows can be
//! stored either per element (`row_ids[i]` is the row owning element `i`) or
//! per row (`row_splits[r]..row_splits[r + 1]` is the element range of row
//! `r`, CSR style). Both directions run in a single linear pass and validate
//! their input in that same pass.
//!
//! # Determinism
//! All functions are pure; the `par_*` variants (feature `rayon`) return
//! exactly what their sequential counterparts return, including the error
//! reported for malformed input.

use itertools::Itertools;

use super::checked_u32;
use crate::ragged_error::{RaggedError, RowIdViolation, RowSplitsViolation};

/// Check the row-id at `index` against the range and its predecessor.
#[inline]
fn check_row_id(
    index: usize,
    row_id: u32,
    previous: Option<u32>,
    num_rows: usize,
) -> Result<(), RaggedError> {
    if row_id as usize >= num_rows {
        return Err(RaggedError::InvalidRowId {
            index,
            row_id,
            violation: RowIdViolation::OutOfRange { num_rows },
        });
    }
    match previous {
        Some(previous) if row_id < previous => Err(RaggedError::InvalidRowId {
            index,
            row_id,
            violation: RowIdViolation::Decreasing { previous },
        }),
        _ => Ok(()),
    }
}

fn check_splits_len(num_rows: usize, row_splits: &[u32]) -> Result<(), RaggedError> {
    if num_rows.checked_add(1) != Some(row_splits.len()) {
        return Err(RaggedError::InvalidShape {
            expected: num_rows.saturating_add(1),
            found: row_splits.len(),
        });
    }
    Ok(())
}

/// Write the row-splits of `row_ids` into `row_splits`.
///
/// `row_splits` must have length `num_rows + 1`; it is checked before anything
/// is written. On success `row_splits[r]` is the number of elements whose
/// row-id is `< r`, so `row_splits[0] == 0` and
/// `row_splits[num_rows] == row_ids.len()`. Empty rows (leading, interior, or
/// trailing) get `row_splits[r] == row_splits[r + 1]`.
///
/// # Errors
/// - [`RaggedError::InvalidShape`] if `row_splits.len() != num_rows + 1`.
/// - [`RaggedError::ElementCountOverflow`] if `row_ids.len()` exceeds `u32::MAX`.
/// - [`RaggedError::InvalidRowId`] for the first row-id that is `>= num_rows`
///   or smaller than its predecessor. The contents of `row_splits` are
///   unspecified after this error.
///
/// # Complexity
/// **O(num_elems + num_rows)** time, **O(1)** extra space.
pub fn fill_row_splits(
    row_ids: &[u32],
    num_rows: usize,
    row_splits: &mut [u32],
) -> Result<(), RaggedError> {
    check_splits_len(num_rows, row_splits)?;
    let num_elems = checked_u32(row_ids.len())?;
    log::trace!("fill_row_splits: num_elems={num_elems} num_rows={num_rows}");

    row_splits[0] = 0;
    // Highest row whose start offset has been written.
    let mut filled = 0usize;
    let mut previous = None;
    for (i, &row_id) in row_ids.iter().enumerate() {
        if let Err(e) = check_row_id(i, row_id, previous, num_rows) {
            log::debug!("fill_row_splits rejected input: {e}");
            return Err(e);
        }
        let row = row_id as usize;
        if row > filled {
            // Rows filled+1..=row all start here; those strictly below `row`
            // are empty.
            row_splits[filled + 1..=row].fill(i as u32);
            filled = row;
        }
        previous = Some(row_id);
    }
    row_splits[filled + 1..].fill(num_elems);
    Ok(())
}

/// Row-splits of `row_ids`, returned as a new vector of length `num_rows + 1`.
///
/// See [`fill_row_splits`] for the contract.
///
/// # Example
/// ```rust
/// # fn try_main() -> Result<(), ragged_index::ragged_error::RaggedError> {
/// use ragged_index::algs::convert_row_ids_to_row_splits;
/// let splits = convert_row_ids_to_row_splits(&[0, 0, 2, 2], 3)?;
/// assert_eq!(splits, vec![0, 2, 2, 4]);
/// # Ok(())
/// # }
/// # try_main().unwrap();
/// ```
pub fn convert_row_ids_to_row_splits(
    row_ids: &[u32],
    num_rows: usize,
) -> Result<Vec<u32>, RaggedError> {
    let mut row_splits = alloc_zeroed(num_rows.saturating_add(1))?;
    fill_row_splits(row_ids, num_rows, &mut row_splits)?;
    Ok(row_splits)
}

/// Buffer-oriented entry point: `num_rows` is `row_splits.len() - 1`.
///
/// # Errors
/// [`RaggedError::InvalidShape`] if `row_splits` is empty, otherwise as
/// [`fill_row_splits`].
pub fn row_ids_to_row_splits(row_ids: &[u32], row_splits: &mut [u32]) -> Result<(), RaggedError> {
    let num_rows = row_splits
        .len()
        .checked_sub(1)
        .ok_or(RaggedError::InvalidShape {
            expected: 1,
            found: 0,
        })?;
    fill_row_splits(row_ids, num_rows, row_splits)
}

/// Zero-filled output buffer, reserved fallibly.
pub(crate) fn alloc_zeroed(len: usize) -> Result<Vec<u32>, RaggedError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| RaggedError::AllocationFailure { requested: len })?;
    buf.resize(len, 0);
    Ok(buf)
}

/// Check that `row_splits` is a valid offsets array: non-empty, starting at
/// zero, and non-decreasing. Its last entry is taken as `num_elems`.
pub fn validate_row_splits(row_splits: &[u32]) -> Result<(), RaggedError> {
    let reject = |index: usize, violation: RowSplitsViolation| -> Result<(), RaggedError> {
        let e = RaggedError::InvalidRowSplits { index, violation };
        log::debug!("validate_row_splits rejected input: {e}");
        Err(e)
    };
    match row_splits.first() {
        None => return reject(0, RowSplitsViolation::Empty),
        Some(&first) if first != 0 => {
            return reject(0, RowSplitsViolation::NonZeroStart { first });
        }
        Some(_) => {}
    }
    if let Some((i, (&previous, &value))) = row_splits
        .iter()
        .tuple_windows()
        .find_position(|(a, b)| b < a)
    {
        return reject(i + 1, RowSplitsViolation::Decreasing { previous, value });
    }
    if row_splits.len() > 1 {
        // The largest row id written is num_rows - 1.
        checked_u32(row_splits.len() - 2)?;
    }
    Ok(())
}

/// Expand already-validated splits into row-ids.
pub(crate) fn expand_validated(row_splits: &[u32], row_ids: &mut [u32]) {
    for (row, (&start, &end)) in row_splits.iter().tuple_windows().enumerate() {
        row_ids[start as usize..end as usize].fill(row as u32);
    }
}

/// Write the row-ids described by `row_splits` into `row_ids`.
///
/// Row `r` is repeated `row_splits[r + 1] - row_splits[r]` times.
///
/// # Errors
/// - [`RaggedError::InvalidRowSplits`] if `row_splits` fails [`validate_row_splits`].
/// - [`RaggedError::InvalidShape`] if `row_ids.len()` is not the last split.
pub fn fill_row_ids(row_splits: &[u32], row_ids: &mut [u32]) -> Result<(), RaggedError> {
    validate_row_splits(row_splits)?;
    let num_elems = row_splits.last().map_or(0, |&n| n as usize);
    if row_ids.len() != num_elems {
        return Err(RaggedError::InvalidShape {
            expected: num_elems,
            found: row_ids.len(),
        });
    }
    log::trace!(
        "fill_row_ids: num_elems={num_elems} num_rows={}",
        row_splits.len() - 1
    );
    expand_validated(row_splits, row_ids);
    Ok(())
}

/// Row-ids described by `row_splits`, returned as a new vector.
///
/// # Example
/// ```rust
/// # fn try_main() -> Result<(), ragged_index::ragged_error::RaggedError> {
/// use ragged_index::algs::row_splits_to_row_ids;
/// assert_eq!(row_splits_to_row_ids(&[0, 0, 1, 3])?, vec![1, 2, 2]);
/// # Ok(())
/// # }
/// # try_main().unwrap();
/// ```
pub fn row_splits_to_row_ids(row_splits: &[u32]) -> Result<Vec<u32>, RaggedError> {
    validate_row_splits(row_splits)?;
    let num_elems = row_splits.last().map_or(0, |&n| n as usize);
    let mut row_ids = alloc_zeroed(num_elems)?;
    expand_validated(row_splits, &mut row_ids);
    Ok(row_ids)
}

/// Parallel [`fill_row_splits`].
///
/// Validation locates the first offending index with an ordered parallel
/// search, so the reported error matches the sequential one. Each split is
/// then computed independently as a binary search over the sorted row-ids.
#[cfg(feature = "rayon")]
pub fn par_fill_row_splits(
    row_ids: &[u32],
    num_rows: usize,
    row_splits: &mut [u32],
) -> Result<(), RaggedError> {
    use rayon::prelude::*;

    check_splits_len(num_rows, row_splits)?;
    let num_elems = checked_u32(row_ids.len())?;
    log::trace!("par_fill_row_splits: num_elems={num_elems} num_rows={num_rows}");

    let check_at = |i: usize| {
        let previous = i.checked_sub(1).map(|p| row_ids[p]);
        check_row_id(i, row_ids[i], previous, num_rows)
    };
    if let Some(i) = (0..row_ids.len())
        .into_par_iter()
        .position_first(|i| check_at(i).is_err())
    {
        if let Err(e) = check_at(i) {
            log::debug!("par_fill_row_splits rejected input: {e}");
            return Err(e);
        }
    }

    row_splits
        .par_iter_mut()
        .enumerate()
        .for_each(|(r, split)| {
            *split = row_ids.partition_point(|&id| (id as usize) < r) as u32;
        });
    Ok(())
}

/// Parallel [`convert_row_ids_to_row_splits`].
#[cfg(feature = "rayon")]
pub fn par_convert_row_ids_to_row_splits(
    row_ids: &[u32],
    num_rows: usize,
) -> Result<Vec<u32>, RaggedError> {
    let mut row_splits = alloc_zeroed(num_rows.saturating_add(1))?;
    par_fill_row_splits(row_ids, num_rows, &mut row_splits)?;
    Ok(row_splits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_empty_row() {
        assert_eq!(
            convert_row_ids_to_row_splits(&[0, 0, 2, 2], 3).unwrap(),
            vec![0, 2, 2, 4]
        );
    }

    #[test]
    fn leading_and_trailing_empty_rows() {
        assert_eq!(
            convert_row_ids_to_row_splits(&[2, 3, 3], 6).unwrap(),
            vec![0, 0, 0, 1, 3, 3, 3]
        );
    }

    #[test]
    fn empty_input_all_zero() {
        assert_eq!(
            convert_row_ids_to_row_splits(&[], 3).unwrap(),
            vec![0, 0, 0, 0]
        );
        assert_eq!(convert_row_ids_to_row_splits(&[], 0).unwrap(), vec![0]);
    }

    #[test]
    fn single_row() {
        assert_eq!(
            convert_row_ids_to_row_splits(&[0, 0, 0], 1).unwrap(),
            vec![0, 3]
        );
    }

    #[test]
    fn gap_is_not_an_error() {
        assert_eq!(
            convert_row_ids_to_row_splits(&[0, 2], 3).unwrap(),
            vec![0, 1, 1, 2]
        );
    }

    #[test]
    fn decreasing_reports_index_and_previous() {
        let err = convert_row_ids_to_row_splits(&[1, 0], 3).unwrap_err();
        assert_eq!(
            err,
            RaggedError::InvalidRowId {
                index: 1,
                row_id: 0,
                violation: RowIdViolation::Decreasing { previous: 1 },
            }
        );
    }

    #[test]
    fn out_of_range_reports_first_offender() {
        let err = convert_row_ids_to_row_splits(&[0, 1, 3, 4], 3).unwrap_err();
        assert_eq!(
            err,
            RaggedError::InvalidRowId {
                index: 2,
                row_id: 3,
                violation: RowIdViolation::OutOfRange { num_rows: 3 },
            }
        );
    }

    #[test]
    fn zero_rows_rejects_any_element() {
        let err = convert_row_ids_to_row_splits(&[0], 0).unwrap_err();
        assert!(matches!(
            err,
            RaggedError::InvalidRowId {
                index: 0,
                violation: RowIdViolation::OutOfRange { num_rows: 0 },
                ..
            }
        ));
    }

    #[test]
    fn wrong_buffer_len_is_untouched() {
        let mut buf = [7u32; 3];
        let err = fill_row_splits(&[0, 1], 3, &mut buf).unwrap_err();
        assert_eq!(
            err,
            RaggedError::InvalidShape {
                expected: 4,
                found: 3
            }
        );
        assert_eq!(buf, [7, 7, 7]);
    }

    #[test]
    fn buffer_entry_point_derives_num_rows() {
        let mut buf = [9u32; 4];
        row_ids_to_row_splits(&[0, 0, 2, 2], &mut buf).unwrap();
        assert_eq!(buf, [0, 2, 2, 4]);

        let mut empty: [u32; 0] = [];
        assert_eq!(
            row_ids_to_row_splits(&[], &mut empty),
            Err(RaggedError::InvalidShape {
                expected: 1,
                found: 0
            })
        );
    }

    #[test]
    fn splits_to_ids() {
        assert_eq!(row_splits_to_row_ids(&[0, 0, 1, 3]).unwrap(), vec![1, 2, 2]);
        assert_eq!(row_splits_to_row_ids(&[0]).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn validate_splits_violations() {
        assert_eq!(
            validate_row_splits(&[]),
            Err(RaggedError::InvalidRowSplits {
                index: 0,
                violation: RowSplitsViolation::Empty
            })
        );
        assert_eq!(
            validate_row_splits(&[1, 2]),
            Err(RaggedError::InvalidRowSplits {
                index: 0,
                violation: RowSplitsViolation::NonZeroStart { first: 1 }
            })
        );
        assert_eq!(
            validate_row_splits(&[0, 3, 2, 5]),
            Err(RaggedError::InvalidRowSplits {
                index: 2,
                violation: RowSplitsViolation::Decreasing {
                    previous: 3,
                    value: 2
                }
            })
        );
    }

    #[test]
    fn fill_row_ids_checks_len() {
        let mut out = [0u32; 2];
        assert_eq!(
            fill_row_ids(&[0, 1, 3], &mut out),
            Err(RaggedError::InvalidShape {
                expected: 3,
                found: 2
            })
        );
        let mut out = [5u32; 3];
        fill_row_ids(&[0, 1, 3], &mut out).unwrap();
        assert_eq!(out, [0, 1, 1]);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_matches_sequential_errors() {
        for (ids, rows) in [
            (vec![1u32, 0], 3usize),
            (vec![0, 1, 3, 4], 3),
            (vec![0, 2, 2, 1, 9], 3),
            (vec![0, 0, 2, 2], 3),
        ] {
            assert_eq!(
                par_convert_row_ids_to_row_splits(&ids, rows),
                convert_row_ids_to_row_splits(&ids, rows)
            );
        }
    }
}
