//! The immutable, freely shared side of a bundle.

use super::{BundleKey, PCollection, WindowedValue};
use crate::time::{format_iso8601, Timestamp};
use std::fmt;
use std::sync::Arc;

/// A frozen snapshot of a bundle, stamped with a watermark.
///
/// Elements are held behind an `Arc`, so clones share storage and concurrent
/// readers need no synchronization.
#[derive(Debug)]
pub struct CommittedBundle<T> {
    collection: PCollection<T>,
    key: Option<BundleKey>,
    elements: Arc<[WindowedValue<T>]>,
    watermark: Timestamp,
}

impl<T> CommittedBundle<T> {
    pub(crate) fn new(
        collection: PCollection<T>,
        key: Option<BundleKey>,
        elements: Vec<WindowedValue<T>>,
        watermark: Timestamp,
    ) -> Self {
        Self {
            collection,
            key,
            elements: Arc::from(elements),
            watermark,
        }
    }

    /// Returns the key shared by all elements, if the bundle is keyed.
    #[must_use]
    pub fn key(&self) -> Option<&BundleKey> {
        self.key.as_ref()
    }

    /// Returns true if the bundle was created keyed.
    #[must_use]
    pub fn is_keyed(&self) -> bool {
        self.key.is_some()
    }

    /// Returns the elements in insertion order.
    #[must_use]
    pub fn elements(&self) -> &[WindowedValue<T>] {
        &self.elements
    }

    /// Returns the collection the elements belong to.
    #[must_use]
    pub fn collection(&self) -> &PCollection<T> {
        &self.collection
    }

    /// Returns the watermark supplied at commit time.
    #[must_use]
    pub fn synchronized_processing_output_watermark(&self) -> Timestamp {
        self.watermark
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the bundle holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates over the elements in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, WindowedValue<T>> {
        self.elements.iter()
    }

    /// Iterates over the bare values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.elements.iter().map(|e| &e.value)
    }
}

impl<T> Clone for CommittedBundle<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            key: self.key.clone(),
            elements: Arc::clone(&self.elements),
            watermark: self.watermark,
        }
    }
}

impl<'a, T> IntoIterator for &'a CommittedBundle<T> {
    type Item = &'a WindowedValue<T>;
    type IntoIter = std::slice::Iter<'a, WindowedValue<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> fmt::Display for CommittedBundle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommittedBundle{{collection={}", self.collection)?;
        if let Some(key) = &self.key {
            write!(f, ", key={key}")?;
        }
        write!(
            f,
            ", elements={}, watermark={}}}",
            self.elements.len(),
            format_iso8601(&self.watermark)
        )
    }
}
