//! Collection identities, bundle keys and output tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

/// Typed identity of a pipeline collection.
///
/// Two handles are equal when they name the same collection, regardless of
/// how they were obtained. Cloning is cheap.
pub struct PCollection<T> {
    id: Uuid,
    name: Arc<str>,
    _element: PhantomData<fn() -> T>,
}

impl<T> PCollection<T> {
    /// Creates a new collection with a fresh identity.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: Arc::from(name.into()),
            _element: PhantomData,
        }
    }

    /// Returns the unique collection id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Clone for PCollection<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: Arc::clone(&self.name),
            _element: PhantomData,
        }
    }
}

impl<T> PartialEq for PCollection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for PCollection<T> {}

impl<T> Hash for PCollection<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for PCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PCollection")
            .field("name", &self.name)
            .field("id", &self.id)
            .finish()
    }
}

impl<T> fmt::Display for PCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The key shared by every element of a keyed bundle.
///
/// Keys are opaque to this core: they are compared, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleKey(serde_json::Value);

impl BundleKey {
    /// Wraps a JSON value as a key.
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Returns the underlying value.
    #[must_use]
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl fmt::Display for BundleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BundleKey {
    fn from(value: &str) -> Self {
        Self(serde_json::Value::String(value.to_string()))
    }
}

impl From<String> for BundleKey {
    fn from(value: String) -> Self {
        Self(serde_json::Value::String(value))
    }
}

impl From<i64> for BundleKey {
    fn from(value: i64) -> Self {
        Self(serde_json::Value::from(value))
    }
}

impl From<serde_json::Value> for BundleKey {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Identifies a tagged (side) output of a step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TupleTag(String);

impl TupleTag {
    /// Creates a tag.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the tag id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TupleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
