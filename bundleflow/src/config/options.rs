//! Pipeline options and their layered loader.

use crate::errors::{ensure_argument, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;
use tracing::debug;

/// Prefix for environment overrides, e.g. `BUNDLEFLOW_PARALLELISM=4`.
pub const ENV_PREFIX: &str = "BUNDLEFLOW";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Options consumed by source splitting and the read driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Number of workers sources are split for. Must be > 0.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Name of the job, used in log fields.
    #[serde(default = "default_job_name")]
    pub job_name: String,
    /// Maximum elements per bundle emitted by the read driver; 0 means unbounded.
    #[serde(default)]
    pub max_bundle_size: usize,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

fn default_job_name() -> String {
    "bundleflow".to_string()
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            job_name: default_job_name(),
            max_bundle_size: 0,
            logging: LoggingConfig::default(),
        }
    }
}

impl PipelineOptions {
    /// Creates options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the parallelism.
    #[must_use]
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Sets the job name.
    #[must_use]
    pub fn with_job_name(mut self, job_name: impl Into<String>) -> Self {
        self.job_name = job_name.into();
        self
    }

    /// Sets the maximum bundle size.
    #[must_use]
    pub fn with_max_bundle_size(mut self, max_bundle_size: usize) -> Self {
        self.max_bundle_size = max_bundle_size;
        self
    }

    /// Sets the logging configuration.
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Checks the options.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `parallelism` is zero.
    pub fn validate(&self) -> Result<()> {
        ensure_argument(self.parallelism > 0, || {
            "parallelism must be larger than 0".to_string()
        })
    }

    /// Loads options from an optional file, then `BUNDLEFLOW_*` environment
    /// variables, over the defaults. The file format follows its extension.
    ///
    /// # Errors
    ///
    /// Returns `Config` if a source cannot be read or parsed, and
    /// `InvalidArgument` if the merged options are invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    pub(crate) fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let options: Self = builder.build()?.try_deserialize()?;
        options.validate()?;

        debug!(
            job_name = %options.job_name,
            parallelism = options.parallelism,
            max_bundle_size = options.max_bundle_size,
            "Pipeline options loaded"
        );
        Ok(options)
    }
}
