//! Timestamped, windowed records.

use crate::errors::{ensure_argument, Result};
use crate::time::{Timestamp, MAX_TIMESTAMP, MIN_TIMESTAMP};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A window an element belongs to.
///
/// Window assignment itself happens upstream; this core only carries the
/// result alongside each element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundedWindow {
    /// The single window spanning all of time.
    Global,
    /// A half-open interval `[start, end)`.
    Interval {
        /// Inclusive start.
        start: Timestamp,
        /// Exclusive end.
        end: Timestamp,
    },
}

impl BoundedWindow {
    /// Creates the interval window `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `start > end`.
    pub fn interval(start: Timestamp, end: Timestamp) -> Result<Self> {
        ensure_argument(start <= end, || {
            format!(
                "Window start {} must not exceed window end {}",
                start.timestamp_millis(),
                end.timestamp_millis()
            )
        })?;
        Ok(Self::Interval { start, end })
    }

    /// Returns the largest timestamp that can fall inside this window.
    ///
    /// An interval ending at [`MIN_TIMESTAMP`] saturates to it.
    #[must_use]
    pub fn max_timestamp(&self) -> Timestamp {
        match self {
            Self::Global => MAX_TIMESTAMP,
            Self::Interval { end, .. } => end
                .checked_sub_signed(Duration::milliseconds(1))
                .unwrap_or(MIN_TIMESTAMP),
        }
    }

    /// Returns true if the timestamp falls inside the window.
    #[must_use]
    pub fn contains(&self, ts: Timestamp) -> bool {
        match self {
            Self::Global => true,
            Self::Interval { start, end } => *start <= ts && ts < *end,
        }
    }
}

impl fmt::Display for BoundedWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "GlobalWindow"),
            Self::Interval { start, end } => write!(
                f,
                "[{}..{})",
                start.timestamp_millis(),
                end.timestamp_millis()
            ),
        }
    }
}

/// Everything about a windowed record except the value itself.
///
/// Output notifications carry this so listeners never need the element type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementMetadata {
    /// The element's event timestamp.
    pub timestamp: Timestamp,
    /// The windows the element was assigned to.
    pub windows: Vec<BoundedWindow>,
}

/// A value paired with its event timestamp and windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowedValue<T> {
    /// The element.
    pub value: T,
    /// The element's event timestamp.
    pub timestamp: Timestamp,
    /// The windows the element was assigned to.
    pub windows: Vec<BoundedWindow>,
}

impl<T> WindowedValue<T> {
    /// Creates a windowed value.
    pub fn new(value: T, timestamp: Timestamp, windows: Vec<BoundedWindow>) -> Self {
        Self {
            value,
            timestamp,
            windows,
        }
    }

    /// Places a value in the global window at the minimum timestamp.
    pub fn in_global_window(value: T) -> Self {
        Self::new(value, MIN_TIMESTAMP, vec![BoundedWindow::Global])
    }

    /// Places a value in the global window at the given timestamp.
    pub fn timestamped(value: T, timestamp: Timestamp) -> Self {
        Self::new(value, timestamp, vec![BoundedWindow::Global])
    }

    /// Replaces the value, keeping timestamp and windows.
    pub fn with_value<U>(&self, value: U) -> WindowedValue<U> {
        WindowedValue {
            value,
            timestamp: self.timestamp,
            windows: self.windows.clone(),
        }
    }

    /// Returns the value-free part of this record.
    #[must_use]
    pub fn metadata(&self) -> ElementMetadata {
        ElementMetadata {
            timestamp: self.timestamp,
            windows: self.windows.clone(),
        }
    }
}
