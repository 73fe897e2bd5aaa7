//! Even partitioning of half-open integer ranges.

use crate::errors::{ensure_argument, BundleflowError, Result};

/// Computes `parts + 1` boundaries partitioning `[from, to)` into `parts`
/// contiguous sub-ranges of near-equal length.
///
/// Boundary `i` is `from + round(i * (to - from) / parts)` with ties rounded
/// up, computed exactly in 128-bit integers. Boundaries are non-decreasing,
/// the first is `from` and the last is `to`, so every sub-range is
/// well-formed even when `parts` exceeds the range length (some sub-ranges are
/// then empty).
///
/// # Errors
///
/// Returns `InvalidArgument` if `parts == 0` or `from > to`.
pub fn split_boundaries(from: i64, to: i64, parts: usize) -> Result<Vec<i64>> {
    ensure_argument(parts > 0, || {
        "Number of workers should be larger than 0.".to_string()
    })?;
    ensure_argument(from <= to, || {
        format!("Range start {from} must not exceed range end {to}")
    })?;

    // i * len / parts == i * q + (i * r) / parts, where i * r < parts^2 fits in u128.
    let len = u128::try_from(i128::from(to) - i128::from(from)).unwrap_or_default();
    let parts_wide = parts as u128;
    let (q, r) = (len / parts_wide, len % parts_wide);

    (0..=parts)
        .map(|i| {
            let i = i as u128;
            let scaled = i * r;
            let round_up = u128::from((scaled % parts_wide) * 2 >= parts_wide);
            let offset = i * q + scaled / parts_wide + round_up;
            let boundary = i128::from(from) + i128::try_from(offset).unwrap_or(i128::MAX);
            i64::try_from(boundary).map_err(|_| {
                BundleflowError::internal(format!(
                    "Split boundary {i} of [{from}, {to}) overflowed"
                ))
            })
        })
        .collect()
}
