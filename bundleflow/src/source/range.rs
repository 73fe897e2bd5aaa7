//! A source over a half-open range of integers.

use super::{split_boundaries, BoundedReader, BoundedSource, ReaderState};
use crate::errors::{ensure_argument, ensure_state, BundleflowError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Estimated encoded size of one element, used for size estimates.
pub const BYTES_PER_ELEMENT: u64 = 8;

/// The integers `[from, to)`, yielded in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeSource {
    from: i64,
    to: i64,
}

impl RangeSource {
    /// Creates a source over `[from, to)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `from > to`.
    pub fn new(from: i64, to: i64) -> Result<Self> {
        ensure_argument(from <= to, || {
            format!("Range start {from} must not exceed range end {to}")
        })?;
        Ok(Self { from, to })
    }

    /// Returns the inclusive lower bound.
    #[must_use]
    pub fn from_inclusive(&self) -> i64 {
        self.from
    }

    /// Returns the exclusive upper bound.
    #[must_use]
    pub fn to_exclusive(&self) -> i64 {
        self.to
    }

    /// Returns the number of integers in the range.
    #[must_use]
    pub fn len(&self) -> u64 {
        u64::try_from(i128::from(self.to) - i128::from(self.from)).unwrap_or_default()
    }

    /// Returns true if the range holds no integers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }
}

impl BoundedSource for RangeSource {
    type Output = i64;
    type Reader = RangeReader;

    fn split(&self, desired_parallelism: usize) -> Result<Vec<Self>> {
        let bounds = split_boundaries(self.from, self.to, desired_parallelism)?;
        debug!(
            from = self.from,
            to = self.to,
            parallelism = desired_parallelism,
            "Splitting range source"
        );
        Ok(bounds
            .windows(2)
            .map(|w| Self { from: w[0], to: w[1] })
            .collect())
    }

    fn estimated_size_bytes(&self) -> u64 {
        self.len().saturating_mul(BYTES_PER_ELEMENT)
    }

    fn produces_sorted_keys(&self) -> bool {
        true
    }

    fn create_reader(&self) -> Result<RangeReader> {
        self.validate()?;
        Ok(RangeReader::new(*self))
    }

    fn validate(&self) -> Result<()> {
        // Deserialization bypasses `new`, so the invariant is rechecked here.
        ensure_state(self.from <= self.to, || {
            format!("Malformed range [{}, {})", self.from, self.to)
        })
    }
}

/// Reader over a [`RangeSource`].
///
/// Owns a copy of its source; concurrent readers never share position state.
#[derive(Debug)]
pub struct RangeReader {
    source: RangeSource,
    current: i64,
    state: ReaderState,
}

impl RangeReader {
    fn new(source: RangeSource) -> Self {
        Self {
            source,
            current: source.from,
            state: ReaderState::NotStarted,
        }
    }

    /// Returns the reader's lifecycle state.
    #[must_use]
    pub fn state(&self) -> ReaderState {
        self.state
    }
}

impl BoundedReader for RangeReader {
    type Output = i64;
    type Source = RangeSource;

    fn start(&mut self) -> Result<bool> {
        match self.state {
            ReaderState::NotStarted if self.source.is_empty() => {
                self.state = ReaderState::Exhausted;
                Ok(false)
            }
            ReaderState::NotStarted => {
                self.current = self.source.from;
                self.state = ReaderState::Active;
                Ok(true)
            }
            ReaderState::Closed => Err(BundleflowError::invalid_state(
                "start() called on a closed reader",
            )),
            ReaderState::Active | ReaderState::Exhausted => Err(
                BundleflowError::invalid_state("start() called on a reader that already started"),
            ),
        }
    }

    fn advance(&mut self) -> Result<bool> {
        match self.state {
            ReaderState::Active => {
                self.current += 1;
                if self.current < self.source.to {
                    Ok(true)
                } else {
                    self.state = ReaderState::Exhausted;
                    Ok(false)
                }
            }
            ReaderState::Exhausted => Ok(false),
            ReaderState::NotStarted => Err(BundleflowError::invalid_state(
                "advance() called before start()",
            )),
            ReaderState::Closed => Err(BundleflowError::invalid_state(
                "advance() called on a closed reader",
            )),
        }
    }

    fn current(&self) -> Result<i64> {
        ensure_state(self.state.has_current(), || {
            format!("No current element: reader is {:?}", self.state)
        })?;
        Ok(self.current)
    }

    fn current_source(&self) -> &RangeSource {
        &self.source
    }

    fn close(&mut self) -> Result<()> {
        if self.state != ReaderState::Closed {
            trace!(from = self.source.from, to = self.source.to, "Closing range reader");
            self.state = ReaderState::Closed;
        }
        Ok(())
    }
}
