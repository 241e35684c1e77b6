// brook/src/source/mod.rs

//! Source adapters: the leaves every chain is rooted at.

pub mod generate;
pub mod values;

pub use generate::{GenerateProducer, DROP_BUDGET};
pub use values::{EmptyProducer, ValuesProducer};

/// Lifecycle of a live source handle. Terminal states are permanent; any
/// request arriving afterwards is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SourceState {
  Active,
  Completed,
  Cancelled,
}
