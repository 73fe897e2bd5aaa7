//! Output listener trait and basic implementations.

use crate::bundle::{ElementMetadata, TupleTag};
use parking_lot::RwLock;
use tracing::{debug, info, Level};

/// Receives a notification for every element a step emits.
///
/// `step_name` is set when the note arrived through a step context and `None`
/// when it was reported on the execution context directly. Implementations
/// must be cheap and must not fail; they run on the step's hot path.
///
/// Notes carry only the element's [`ElementMetadata`] (timestamp and
/// windows), never the emitted value, so one listener serves steps of any
/// element type. A listener that needs values must be fed by the step itself.
pub trait OutputListener: Send + Sync {
    /// Called for every main output.
    fn on_output(&self, step_name: Option<&str>, output: &ElementMetadata);

    /// Called for every tagged side output.
    fn on_side_output(&self, step_name: Option<&str>, tag: &TupleTag, output: &ElementMetadata);
}

/// A listener that discards all notifications.
///
/// Used as the default when no listener is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpOutputListener;

impl OutputListener for NoOpOutputListener {
    fn on_output(&self, _step_name: Option<&str>, _output: &ElementMetadata) {}

    fn on_side_output(&self, _step_name: Option<&str>, _tag: &TupleTag, _output: &ElementMetadata) {}
}

/// A listener that logs notifications using the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingOutputListener {
    level: Level,
}

impl Default for LoggingOutputListener {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
        }
    }
}

impl LoggingOutputListener {
    /// Creates a logging listener with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    fn log(&self, step_name: Option<&str>, tag: Option<&TupleTag>, output: &ElementMetadata) {
        let tag = tag.map(TupleTag::id);
        if self.level == Level::INFO {
            info!(step = ?step_name, tag = ?tag, timestamp = %output.timestamp, "Output noted");
        } else {
            debug!(step = ?step_name, tag = ?tag, timestamp = %output.timestamp, "Output noted");
        }
    }
}

impl OutputListener for LoggingOutputListener {
    fn on_output(&self, step_name: Option<&str>, output: &ElementMetadata) {
        self.log(step_name, None, output);
    }

    fn on_side_output(&self, step_name: Option<&str>, tag: &TupleTag, output: &ElementMetadata) {
        self.log(step_name, Some(tag), output);
    }
}

/// One notification captured by [`CollectingOutputListener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNote {
    /// The reporting step, if any.
    pub step_name: Option<String>,
    /// The side output tag; `None` for main output.
    pub tag: Option<TupleTag>,
    /// The element's metadata.
    pub metadata: ElementMetadata,
}

/// A collecting listener for testing purposes.
#[derive(Debug, Default)]
pub struct CollectingOutputListener {
    notes: RwLock<Vec<OutputNote>>,
}

impl CollectingOutputListener {
    /// Creates a new collecting listener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected notes.
    #[must_use]
    pub fn notes(&self) -> Vec<OutputNote> {
        self.notes.read().clone()
    }

    /// Returns the number of collected notes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.read().len()
    }

    /// Returns true if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.read().is_empty()
    }

    /// Clears all collected notes.
    pub fn clear(&self) {
        self.notes.write().clear();
    }
}

impl OutputListener for CollectingOutputListener {
    fn on_output(&self, step_name: Option<&str>, output: &ElementMetadata) {
        self.notes.write().push(OutputNote {
            step_name: step_name.map(str::to_string),
            tag: None,
            metadata: output.clone(),
        });
    }

    fn on_side_output(&self, step_name: Option<&str>, tag: &TupleTag, output: &ElementMetadata) {
        self.notes.write().push(OutputNote {
            step_name: step_name.map(str::to_string),
            tag: Some(tag.clone()),
            metadata: output.clone(),
        });
    }
}
