//! Error types for bundleflow.
//!
//! Every failure this crate reports is a caller-side protocol violation or a
//! missing optional capability. Nothing here is retried internally; retry
//! policy belongs to whoever drives sources, readers and steps.

use std::collections::HashMap;
use thiserror::Error;

/// Convenience result alias used throughout the crate.
pub type Result<T, E = BundleflowError> = std::result::Result<T, E>;

/// The main error type for bundleflow operations.
#[derive(Debug, Error)]
pub enum BundleflowError {
    /// An argument failed a precondition (e.g. zero parallelism, inverted range).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was attempted in a state that does not permit it.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// An optional capability was not supplied by the concrete implementation.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Pipeline options could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A generic internal error (e.g. a worker task panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BundleflowError {
    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates an invalid state error.
    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Creates a not implemented error.
    #[must_use]
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns a stable code for the error category.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::InvalidState(_) => "InvalidState",
            Self::NotImplemented(_) => "NotImplemented",
            Self::Config(_) => "Config",
            Self::Internal(_) => "Internal",
        }
    }

    /// Returns true for caller-side protocol violations.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::InvalidState(_))
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.kind()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Fails with `InvalidArgument` unless `condition` holds.
///
/// The message is built lazily so the happy path does not format anything.
pub fn ensure_argument(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(BundleflowError::InvalidArgument(message()))
    }
}

/// Fails with `InvalidState` unless `condition` holds.
pub fn ensure_state(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(BundleflowError::InvalidState(message()))
    }
}
