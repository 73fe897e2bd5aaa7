//! Per-step contexts.

use super::{StateInternals, TimerInternals};
use crate::bundle::{BoundedWindow, ElementMetadata, TupleTag, WindowedValue};
use crate::errors::{BundleflowError, Result};
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::warn;

/// Receives output notes from step contexts.
///
/// Implemented by [`ExecutionContext`](super::ExecutionContext); step
/// contexts hold it weakly and forward every note to it.
pub trait OutputNotifier: Send + Sync {
    /// Routes a main output note.
    fn notify_output(&self, step_name: Option<&str>, output: &ElementMetadata);

    /// Routes a side output note.
    fn notify_side_output(&self, step_name: Option<&str>, tag: &TupleTag, output: &ElementMetadata);
}

/// Notifier for contexts that have no owning execution context.
struct Detached;

impl OutputNotifier for Detached {
    fn notify_output(&self, _step_name: Option<&str>, _output: &ElementMetadata) {}

    fn notify_side_output(&self, _step_name: Option<&str>, _tag: &TupleTag, _output: &ElementMetadata) {}
}

/// The identity and notification routing every step context shares.
///
/// Richer contexts embed one of these and expose it through
/// [`StepContext::base`]. The back reference to the execution context is
/// weak: a step context never keeps its execution context alive.
#[derive(Clone)]
pub struct BaseStepContext {
    step_name: String,
    transform_name: String,
    notifier: Weak<dyn OutputNotifier>,
    attached: bool,
}

impl BaseStepContext {
    /// Creates a base context routing notes to `notifier`.
    #[must_use]
    pub fn new(
        step_name: impl Into<String>,
        transform_name: impl Into<String>,
        notifier: Weak<dyn OutputNotifier>,
    ) -> Self {
        Self {
            step_name: step_name.into(),
            transform_name: transform_name.into(),
            notifier,
            attached: true,
        }
    }

    /// Creates a base context whose notes go nowhere.
    #[must_use]
    pub fn detached(step_name: impl Into<String>, transform_name: impl Into<String>) -> Self {
        let notifier: Weak<dyn OutputNotifier> = Weak::<Detached>::new();
        Self {
            attached: false,
            ..Self::new(step_name, transform_name, notifier)
        }
    }

    /// Returns true while the owning execution context is alive.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.notifier.strong_count() > 0
    }

    fn notifier(&self) -> Option<Arc<dyn OutputNotifier>> {
        let notifier = self.notifier.upgrade();
        if notifier.is_none() && self.attached {
            warn!(step = %self.step_name, "Output noted on a step context without a live execution context");
        }
        notifier
    }
}

impl fmt::Debug for BaseStepContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseStepContext")
            .field("step_name", &self.step_name)
            .field("transform_name", &self.transform_name)
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// A per-step handle to state, timers and output notification.
///
/// Implementors supply [`base`](Self::base) plus the state and timer
/// accessors; everything else is provided.
pub trait StepContext: Send + Sync {
    /// Returns the shared identity and routing.
    fn base(&self) -> &BaseStepContext;

    /// Returns the step name.
    fn step_name(&self) -> &str {
        &self.base().step_name
    }

    /// Returns the user-visible transform name.
    fn transform_name(&self) -> &str {
        &self.base().transform_name
    }

    /// Notes a main output; forwarded to the owning execution context.
    ///
    /// Only the element's metadata is passed on; listeners never see the value.
    fn note_output(&self, output: &ElementMetadata) {
        let base = self.base();
        if let Some(notifier) = base.notifier() {
            notifier.notify_output(Some(&base.step_name), output);
        }
    }

    /// Notes a side output; forwarded to the owning execution context.
    fn note_side_output(&self, tag: &TupleTag, output: &ElementMetadata) {
        let base = self.base();
        if let Some(notifier) = base.notifier() {
            notifier.notify_side_output(Some(&base.step_name), tag, output);
        }
    }

    /// Materializes the data of a side input view.
    ///
    /// # Errors
    ///
    /// Returns `NotImplemented` unless the concrete context supports views.
    fn write_pcollection_view_data(
        &self,
        tag: &TupleTag,
        _data: &[WindowedValue<serde_json::Value>],
        window: &BoundedWindow,
    ) -> Result<()> {
        Err(BundleflowError::not_implemented(format!(
            "Side input view {tag} for window {window} on step {}",
            self.step_name()
        )))
    }

    /// Returns the state storage for this step.
    fn state_internals(&self) -> Result<Arc<dyn StateInternals>>;

    /// Returns the timer storage for this step.
    fn timer_internals(&self) -> Result<Arc<dyn TimerInternals>>;
}

impl StepContext for BaseStepContext {
    fn base(&self) -> &BaseStepContext {
        self
    }

    fn state_internals(&self) -> Result<Arc<dyn StateInternals>> {
        Err(BundleflowError::not_implemented(format!(
            "State internals for step {}",
            self.step_name
        )))
    }

    fn timer_internals(&self) -> Result<Arc<dyn TimerInternals>> {
        Err(BundleflowError::not_implemented(format!(
            "Timer internals for step {}",
            self.step_name
        )))
    }
}
