//! Interfaces to runner-supplied state and timer storage.
//!
//! This crate never implements these; concrete step contexts obtain them from
//! whatever storage engine the runner uses.

use crate::bundle::BundleKey;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Per-key state storage available to a step.
pub trait StateInternals: Send + Sync + Debug {
    /// Returns the key state is scoped to, or `None` for unkeyed steps.
    fn key(&self) -> Option<&BundleKey>;
}

/// The clock a timer fires against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeDomain {
    /// Fires when the input watermark passes the timestamp.
    EventTime,
    /// Fires when wall-clock time passes the timestamp.
    ProcessingTime,
    /// Fires when the synchronized processing time passes the timestamp.
    SynchronizedProcessingTime,
}

/// A timer registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerData {
    /// The state namespace the timer belongs to (usually a window).
    pub namespace: String,
    /// When the timer fires.
    pub timestamp: Timestamp,
    /// Which clock the timestamp refers to.
    pub domain: TimeDomain,
}

impl TimerData {
    /// Creates a timer registration.
    #[must_use]
    pub fn new(namespace: impl Into<String>, timestamp: Timestamp, domain: TimeDomain) -> Self {
        Self {
            namespace: namespace.into(),
            timestamp,
            domain,
        }
    }
}

/// Timer storage and clocks available to a step.
pub trait TimerInternals: Send + Sync + Debug {
    /// Registers a timer, replacing any with the same namespace and domain.
    fn set_timer(&self, timer: TimerData);

    /// Removes a timer.
    fn delete_timer(&self, timer: &TimerData);

    /// Returns the current processing time.
    fn current_processing_time(&self) -> Timestamp;

    /// Returns the current synchronized processing time, if known.
    fn current_synchronized_processing_time(&self) -> Option<Timestamp>;

    /// Returns the input watermark of the step.
    fn current_input_watermark_time(&self) -> Timestamp;

    /// Returns the output watermark of the step, if known.
    fn current_output_watermark_time(&self) -> Option<Timestamp>;
}
