//! The mutable, single-writer side of a bundle.

use super::{BundleKey, CommittedBundle, PCollection, WindowedValue};
use crate::errors::{BundleflowError, Result};
use crate::time::{format_iso8601, Timestamp};
use tracing::debug;

/// Accumulated elements are only reachable through the `Open` variant, so a
/// mutator cannot touch them without first establishing the bundle is open.
#[derive(Debug)]
enum BundleState<T> {
    Open(Vec<WindowedValue<T>>),
    Committed,
}

/// An append-only accumulator of records destined for one collection.
///
/// The producing task owns the bundle exclusively until [`commit`] turns the
/// accumulated records into a [`CommittedBundle`] that any number of
/// consumers may read concurrently. Keyedness is fixed at construction.
///
/// [`commit`]: UncommittedBundle::commit
#[derive(Debug)]
pub struct UncommittedBundle<T> {
    collection: PCollection<T>,
    key: Option<BundleKey>,
    state: BundleState<T>,
}

impl<T> UncommittedBundle<T> {
    /// Creates a bundle with no key.
    #[must_use]
    pub fn unkeyed(collection: PCollection<T>) -> Self {
        Self::with_key(collection, None)
    }

    /// Creates a bundle whose elements all share `key`.
    #[must_use]
    pub fn keyed(collection: PCollection<T>, key: impl Into<BundleKey>) -> Self {
        Self::with_key(collection, Some(key.into()))
    }

    pub(crate) fn with_key(collection: PCollection<T>, key: Option<BundleKey>) -> Self {
        Self {
            collection,
            key,
            state: BundleState::Open(Vec::new()),
        }
    }

    /// Returns the target collection.
    #[must_use]
    pub fn collection(&self) -> &PCollection<T> {
        &self.collection
    }

    /// Returns the key, if the bundle is keyed.
    #[must_use]
    pub fn key(&self) -> Option<&BundleKey> {
        self.key.as_ref()
    }

    /// Returns true if the bundle was created keyed.
    #[must_use]
    pub fn is_keyed(&self) -> bool {
        self.key.is_some()
    }

    /// Returns true once [`commit`](Self::commit) has succeeded.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self.state, BundleState::Committed)
    }

    /// Returns the number of elements added so far (zero after commit).
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.state {
            BundleState::Open(elements) => elements.len(),
            BundleState::Committed => 0,
        }
    }

    /// Returns true if nothing has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a record.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the bundle has already been committed.
    pub fn add(&mut self, element: WindowedValue<T>) -> Result<&mut Self> {
        if let BundleState::Open(elements) = &mut self.state {
            elements.push(element);
            return Ok(self);
        }
        Err(BundleflowError::invalid_state(format!(
            "Can't add element to committed bundle for collection {}",
            self.collection
        )))
    }

    /// Seals the bundle, stamping `watermark` as its synchronized processing
    /// output watermark.
    ///
    /// Insertion order is preserved. After this call the bundle rejects every
    /// further `add` and `commit`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the bundle has already been committed.
    pub fn commit(&mut self, watermark: Timestamp) -> Result<CommittedBundle<T>> {
        match std::mem::replace(&mut self.state, BundleState::Committed) {
            BundleState::Open(elements) => {
                debug!(
                    collection = %self.collection,
                    key = ?self.key,
                    elements = elements.len(),
                    watermark = %format_iso8601(&watermark),
                    "Committing bundle"
                );
                Ok(CommittedBundle::new(
                    self.collection.clone(),
                    self.key.clone(),
                    elements,
                    watermark,
                ))
            }
            BundleState::Committed => Err(BundleflowError::invalid_state(format!(
                "Can't commit already committed bundle for collection {}",
                self.collection
            ))),
        }
    }
}
