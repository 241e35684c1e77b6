// brook/src/protocol/traits.rs

//! The demand-driven core: a `Producer` emits positions only in response to
//! `Handle::request`, and a `Consumer` receives them one at a time, steering
//! the producer through the control values it returns.

use std::sync::Arc;

use super::control::{ChainControl, Demand};
use crate::error::BrookResult;

/// Receiving side of a live subscription.
///
/// One position is either a value (`next`) or an absent slot (`next_absent`).
/// Absent slots are real positions: they count for `limit` and `skip`, and it
/// is the default terminal consumption that finally drops them.
pub trait Consumer<T> {
  /// Delivers one value. Returning `Ok(ChainControl::Stop)` cancels the
  /// chain; returning `Err` aborts the whole evaluation.
  fn next(&mut self, value: T) -> BrookResult<ChainControl>;

  /// Delivers one absent position.
  fn next_absent(&mut self) -> BrookResult<ChainControl>;

  /// The upstream is exhausted. Terminal signal, sent at most once.
  fn on_complete(&mut self);

  /// The chain was cancelled. Terminal signal, sent at most once.
  fn on_cancelled(&mut self);

  /// An element-level failure occurred upstream. The failing position has
  /// already been delivered as absent; the error itself travels separately
  /// so a hook can decide whether the chain survives it.
  fn on_error(&mut self, error: anyhow::Error) -> BrookResult<ChainControl>;
}

/// Driving side of a live subscription, owned by whoever subscribed.
pub trait Handle {
  /// Pulls the next unit of work from upstream. After completion or
  /// cancellation this is a no-op.
  fn request(&mut self, demand: Demand) -> BrookResult<()>;

  /// Stops production permanently. Idempotent.
  fn cancel(&mut self);
}

/// A lazy, re-subscribable description of one stage of a chain.
///
/// Subscribing wires `consumer` to this stage and everything upstream of it
/// and returns the handle that drives the fresh evaluation. Descriptions are
/// immutable; every subscription owns its own state.
pub trait Producer<T>: Send + Sync {
  fn subscribe(&self, consumer: BoxConsumer<T>) -> BoxHandle;
}

pub type BoxConsumer<T> = Box<dyn Consumer<T>>;
pub type BoxHandle = Box<dyn Handle>;

// Type alias for predicate closures stored in chain descriptions.
// Uses Arc to be easily cloneable and shareable.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync + 'static>;
