//! Index compaction under a keep/drop mask.

use super::checked_u32;
use crate::ragged_error::RaggedError;

/// Original indices of the elements kept by `keep`, in increasing order.
///
/// `new2old[j]` is the position in the unfiltered array of the `j`-th
/// surviving element. The output is reserved up front from a true-count
/// pre-pass, so it holds exactly that many entries.
///
/// # Errors
/// - [`RaggedError::ElementCountOverflow`] if `keep.len()` exceeds `u32::MAX`.
/// - [`RaggedError::AllocationFailure`] if the output cannot be reserved.
///
/// # Example
/// ```rust
/// # fn try_main() -> Result<(), ragged_index::ragged_error::RaggedError> {
/// use ragged_index::algs::compact_indices;
/// let keep = [false, false, true, false, true, false, true, true];
/// assert_eq!(compact_indices(&keep)?, vec![2, 4, 6, 7]);
/// # Ok(())
/// # }
/// # try_main().unwrap();
/// ```
pub fn compact_indices(keep: &[bool]) -> Result<Vec<u32>, RaggedError> {
    checked_u32(keep.len())?;
    let num_kept = keep.iter().filter(|&&k| k).count();
    log::trace!(
        "compact_indices: num_old_elems={} num_kept={num_kept}",
        keep.len()
    );

    let mut new2old = Vec::new();
    new2old
        .try_reserve_exact(num_kept)
        .map_err(|_| RaggedError::AllocationFailure {
            requested: num_kept,
        })?;
    new2old.extend(
        keep.iter()
            .enumerate()
            .filter_map(|(i, &k)| k.then_some(i as u32)),
    );
    Ok(new2old)
}

/// Buffer-oriented name for [`compact_indices`]: returns a newly allocated
/// new2old mapping whose length is the number of `true` entries in `keep`.
#[inline]
pub fn get_new2old(keep: &[bool]) -> Result<Vec<u32>, RaggedError> {
    compact_indices(keep)
}

/// Parallel [`compact_indices`]; output order matches the sequential scan.
#[cfg(feature = "rayon")]
pub fn par_compact_indices(keep: &[bool]) -> Result<Vec<u32>, RaggedError> {
    use rayon::prelude::*;

    checked_u32(keep.len())?;
    let num_kept = keep.par_iter().filter(|&&k| k).count();
    log::trace!(
        "par_compact_indices: num_old_elems={} num_kept={num_kept}",
        keep.len()
    );

    let mut new2old = Vec::new();
    new2old
        .try_reserve_exact(num_kept)
        .map_err(|_| RaggedError::AllocationFailure {
            requested: num_kept,
        })?;
    new2old.par_extend(
        keep.par_iter()
            .enumerate()
            .filter_map(|(i, &k)| k.then_some(i as u32)),
    );
    Ok(new2old)
}
