//! Output notification listeners.
//!
//! An execution context forwards every `note_output` / `note_side_output`
//! call, whether made on the context itself or on one of its step contexts,
//! to a single [`OutputListener`]. Listeners are where metrics and watermark
//! tracking hook in.

mod counting;
mod listener;

pub use counting::{CountingOutputListener, StepOutputStats, UNATTRIBUTED_STEP};
pub use listener::{
    CollectingOutputListener, LoggingOutputListener, NoOpOutputListener, OutputListener,
    OutputNote,
};
