//! A minimal in-process runner built on sources, bundles and step contexts.

mod pardo;
mod read;
#[cfg(test)]
mod runner_tests;

pub use pardo::ParDoStep;
pub use read::BoundedReadDriver;
