//! Execution and step contexts.
//!
//! This module provides:
//! - A per-run registry that creates each step's context once and caches it
//! - The step context trait with output-note forwarding to the registry
//! - Interfaces for runner-supplied state and timer storage

mod execution;
mod internals;
mod step;

pub use execution::{ExecutionContext, StepContextArgs, StepContextFactory};
pub use internals::{StateInternals, TimeDomain, TimerData, TimerInternals};
pub use step::{BaseStepContext, OutputNotifier, StepContext};
