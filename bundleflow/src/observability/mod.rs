//! Observability utilities.

mod logging;
mod sampler;

pub use logging::init_tracing;
pub use sampler::{ScopedState, StateSampler};
