//! Configuration for pipeline runs.

mod options;

pub use options::{LogFormat, LoggingConfig, PipelineOptions, ENV_PREFIX};
