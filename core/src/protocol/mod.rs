// brook/src/protocol/mod.rs

//! The producer/consumer/handle protocol and its control signals.

pub mod control;
pub mod traits;

pub use control::{ChainControl, Demand, ErrorControl};
pub use traits::{BoxConsumer, BoxHandle, Consumer, Handle, Predicate, Producer};
