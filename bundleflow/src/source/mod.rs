//! Bounded sources and the readers that consume them.
//!
//! A [`BoundedSource`] is an immutable description of a finite piece of input.
//! It can split itself for parallel consumption and hands out independent,
//! single-use [`BoundedReader`]s. Readers follow a pull protocol:
//!
//! ```text
//! NotStarted --start()--> Active --advance()*--> Exhausted
//!      \                     \                      |
//!       +-------close()-------+-------close()-------+--> Closed
//! ```

mod range;
mod split;

pub use range::{RangeReader, RangeSource, BYTES_PER_ELEMENT};
pub use split::split_boundaries;

use crate::config::PipelineOptions;
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::warn;

/// An immutable, splittable description of a finite range of data.
///
/// Sources never change after construction, so they can be re-split and
/// re-read any number of times, from any thread.
pub trait BoundedSource: Send + Sync + Debug {
    /// The type of value produced by readers of this source.
    type Output: Send;

    /// The reader type bound to this source.
    type Reader: BoundedReader<Output = Self::Output, Source = Self>;

    /// Partitions the source into exactly `desired_parallelism` contiguous,
    /// non-overlapping sub-sources whose union is this source.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `desired_parallelism == 0`.
    fn split(&self, desired_parallelism: usize) -> Result<Vec<Self>>
    where
        Self: Sized;

    /// Splits using the parallelism configured in `options`.
    fn split_with_options(&self, options: &PipelineOptions) -> Result<Vec<Self>>
    where
        Self: Sized,
    {
        self.split(options.parallelism)
    }

    /// Returns an estimate of the source's size, proportional to its length.
    fn estimated_size_bytes(&self) -> u64;

    /// Returns true if readers yield keys in non-decreasing order.
    fn produces_sorted_keys(&self) -> bool {
        false
    }

    /// Creates a fresh reader positioned before the first element.
    fn create_reader(&self) -> Result<Self::Reader>;

    /// Checks the source's own invariants.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the source is malformed.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Lifecycle of a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReaderState {
    /// Created, `start` not yet called.
    NotStarted,
    /// Positioned on a valid current element.
    Active,
    /// Ran past the last element.
    Exhausted,
    /// Closed; terminal.
    Closed,
}

impl ReaderState {
    /// Returns true if `current` may be called.
    #[must_use]
    pub fn has_current(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A stateful, single-use cursor over one source.
///
/// A reader is owned by one task at a time. It is not restartable: once
/// closed, create a new reader from the source to read again.
pub trait BoundedReader: Send {
    /// The type of value produced.
    type Output;

    /// The source this reader was created from.
    type Source: BoundedSource;

    /// Moves to the first element. Returns false if the source is empty.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if called more than once or after `close`.
    fn start(&mut self) -> Result<bool>;

    /// Moves to the next element. Returns false once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if called before `start` or after `close`.
    fn advance(&mut self) -> Result<bool>;

    /// Returns the element the reader is positioned on.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the last `start`/`advance` returned true
    /// and the reader has not been closed.
    fn current(&self) -> Result<Self::Output>;

    /// Returns the source this reader reads.
    fn current_source(&self) -> &Self::Source;

    /// Releases the reader. Idempotent.
    fn close(&mut self) -> Result<()>;
}

/// Drives a reader as an iterator, closing it once exhausted or on error.
#[derive(Debug)]
pub struct ReaderIter<R> {
    reader: R,
    started: bool,
    done: bool,
}

impl<R: BoundedReader> ReaderIter<R> {
    /// Wraps a reader that has not been started.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            started: false,
            done: false,
        }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BoundedReader> Iterator for ReaderIter<R> {
    type Item = Result<R::Output>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let available = if self.started {
            self.reader.advance()
        } else {
            self.started = true;
            self.reader.start()
        };

        let item = match available {
            Ok(true) => match self.reader.current() {
                Ok(value) => return Some(Ok(value)),
                Err(err) => Some(Err(err)),
            },
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        };

        self.done = true;
        match (item, self.reader.close()) {
            (None, Err(close_err)) => Some(Err(close_err)),
            (item, Err(close_err)) => {
                warn!(error = %close_err, "Failed to close reader after a read error");
                item
            }
            (item, Ok(())) => item,
        }
    }
}

/// Reads every value of `source` with a fresh reader.
pub fn read_all<S: BoundedSource>(source: &S) -> Result<Vec<S::Output>> {
    ReaderIter::new(source.create_reader()?).collect()
}
