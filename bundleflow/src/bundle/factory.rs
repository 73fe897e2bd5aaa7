//! Creation of output bundles.

use super::{BundleKey, CommittedBundle, PCollection, UncommittedBundle};

/// Creates bundles for the in-process runner.
///
/// Output bundles inherit the key of the input they were produced from, so a
/// step consuming a keyed bundle keeps writing keyed output unless it
/// explicitly re-keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundleFactory;

impl BundleFactory {
    /// Creates a new factory.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Creates an unkeyed bundle for a root (source) collection.
    #[must_use]
    pub fn create_root_bundle<T>(&self, output: PCollection<T>) -> UncommittedBundle<T> {
        UncommittedBundle::unkeyed(output)
    }

    /// Creates a bundle for `output` carrying the key of `input`.
    #[must_use]
    pub fn create_bundle<I, T>(
        &self,
        input: &CommittedBundle<I>,
        output: PCollection<T>,
    ) -> UncommittedBundle<T> {
        UncommittedBundle::with_key(output, input.key().cloned())
    }

    /// Creates a bundle for `output` keyed by `key`, whatever the input's key.
    #[must_use]
    pub fn create_keyed_bundle<I, T>(
        &self,
        _input: &CommittedBundle<I>,
        key: impl Into<BundleKey>,
        output: PCollection<T>,
    ) -> UncommittedBundle<T> {
        UncommittedBundle::keyed(output, key)
    }
}
