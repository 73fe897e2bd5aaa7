//! Bundles: the unit in which records flow between steps.
//!
//! This module provides:
//! - Windowed, timestamped records
//! - Typed collection identities and opaque bundle keys
//! - Mutable bundles that become immutable, watermark-stamped snapshots on commit
//! - A factory that propagates keys from input to output bundles

#[cfg(test)]
mod bundle_tests;
mod collection;
mod committed;
mod factory;
mod uncommitted;
mod windowed;

pub use collection::{BundleKey, PCollection, TupleTag};
pub use committed::CommittedBundle;
pub use factory::BundleFactory;
pub use uncommitted::UncommittedBundle;
pub use windowed::{BoundedWindow, ElementMetadata, WindowedValue};
