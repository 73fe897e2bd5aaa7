//! Attribution of wall time to named execution states.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Accumulates time spent in named execution states (e.g. "process",
/// "commit") for one step or worker.
///
/// Shared as `Arc<StateSampler>`; each [`scoped`](Self::scoped) guard adds its
/// elapsed time when dropped.
#[derive(Debug, Default)]
pub struct StateSampler {
    name: String,
    totals: Mutex<HashMap<String, Duration>>,
}

impl StateSampler {
    /// Creates a sampler.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            totals: Mutex::new(HashMap::new()),
        })
    }

    /// Returns the sampler name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enters a state until the returned guard is dropped.
    #[must_use]
    pub fn scoped(&self, state: impl Into<String>) -> ScopedState<'_> {
        ScopedState {
            sampler: self,
            state: state.into(),
            start: Instant::now(),
        }
    }

    /// Adds time to a state directly.
    pub fn record(&self, state: &str, elapsed: Duration) {
        *self.totals.lock().entry(state.to_string()).or_default() += elapsed;
    }

    /// Returns the accumulated time in a state.
    #[must_use]
    pub fn total(&self, state: &str) -> Duration {
        self.totals.lock().get(state).copied().unwrap_or_default()
    }

    /// Returns a copy of all accumulated times.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, Duration> {
        self.totals.lock().clone()
    }
}

/// Guard returned by [`StateSampler::scoped`].
#[derive(Debug)]
pub struct ScopedState<'a> {
    sampler: &'a StateSampler,
    state: String,
    start: Instant,
}

impl ScopedState<'_> {
    /// Returns the time spent in the state so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopedState<'_> {
    fn drop(&mut self) {
        self.sampler.record(&self.state, self.start.elapsed());
    }
}
