//! Static row partitioning.
//!
//! Splits `[0, height)` into `worker_count` contiguous half-open ranges whose
//! lengths differ by at most one row. The first `height % worker_count`
//! ranges get the extra row. When there are more workers than rows the
//! trailing ranges are empty.
//!
//! # Example
//!
//! ```rust
//! use kfilter_ops::partition::{partition, RowRange};
//!
//! let ranges = partition(10, 3).unwrap();
//! assert_eq!(ranges, vec![RowRange::new(0, 4), RowRange::new(4, 7), RowRange::new(7, 10)]);
//! ```

use crate::{OpsError, OpsResult};
use std::ops::Range;

/// Half-open row interval `[start, end)` owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowRange {
    /// First row (inclusive).
    pub start: u32,
    /// Last row (exclusive).
    pub end: u32,
}

impl RowRange {
    /// Creates a range. `start` must not exceed `end`.
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// `true` if the range covers no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Row indices in the range.
    #[inline]
    pub fn rows(&self) -> Range<u32> {
        self.start..self.end
    }
}

/// Splits `height` rows among `worker_count` workers.
///
/// Returns exactly `worker_count` ranges in ascending order.
///
/// # Errors
///
/// - [`OpsError::InvalidParameter`] if `worker_count` is zero
/// - [`OpsError::Allocation`] if the range list cannot be allocated
pub fn partition(height: u32, worker_count: usize) -> OpsResult<Vec<RowRange>> {
    if worker_count == 0 {
        return Err(OpsError::InvalidParameter("worker count must be > 0".into()));
    }

    let mut ranges = Vec::new();
    ranges.try_reserve_exact(worker_count).map_err(|e| {
        OpsError::allocation(
            worker_count.saturating_mul(std::mem::size_of::<RowRange>()),
            e.to_string(),
        )
    })?;

    let height = height as usize;
    let base = height / worker_count;
    let remainder = height % worker_count;

    let mut start = 0usize;
    for worker in 0..worker_count {
        let take = base + usize::from(worker < remainder);
        // start + take <= height <= u32::MAX
        ranges.push(RowRange::new(start as u32, (start + take) as u32));
        start += take;
    }
    debug_assert_eq!(start, height);

    Ok(ranges)
}
