//! # Bundleflow
//!
//! The execution core of an in-process pipeline runner.
//!
//! Bundleflow provides:
//!
//! - **Bounded sources**: finite inputs that split into balanced sub-ranges and
//!   hand out single-use pull readers
//! - **Bundles**: per-step output buffers that commit into immutable, shareable
//!   batches stamped with a watermark
//! - **Execution contexts**: a per-run registry that creates each step's
//!   context exactly once and routes output notifications
//! - **A minimal runner**: a parallel read driver and element-wise steps
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bundleflow::prelude::*;
//!
//! let options = PipelineOptions::new().with_parallelism(3);
//! let numbers = PCollection::new("numbers");
//! let bundles = BoundedReadDriver::new(options)
//!     .read(&RangeSource::new(1, 10)?, &numbers)
//!     .await?;
//!
//! let execution = ExecutionContext::basic();
//! let format = ParDoStep::in_context(&execution, "s1", "Format", None, |n: &i64| n.to_string());
//! for bundle in &bundles {
//!     let strings = format.process(bundle, PCollection::new("strings"))?;
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod bundle;
pub mod config;
pub mod context;
pub mod errors;
pub mod events;
pub mod observability;
pub mod runner;
pub mod source;
pub mod time;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bundle::{
        BoundedWindow, BundleFactory, BundleKey, CommittedBundle, ElementMetadata,
        PCollection, TupleTag, UncommittedBundle, WindowedValue,
    };
    pub use crate::config::{LogFormat, LoggingConfig, PipelineOptions};
    pub use crate::context::{
        BaseStepContext, ExecutionContext, StateInternals, StepContext, StepContextArgs,
        StepContextFactory, TimerInternals,
    };
    pub use crate::errors::{BundleflowError, Result};
    pub use crate::events::{
        CollectingOutputListener, CountingOutputListener, LoggingOutputListener,
        NoOpOutputListener, OutputListener,
    };
    pub use crate::observability::{init_tracing, StateSampler};
    pub use crate::runner::{BoundedReadDriver, ParDoStep};
    pub use crate::source::{read_all, BoundedReader, BoundedSource, RangeSource, ReaderIter};
    pub use crate::time::Timestamp;
}
