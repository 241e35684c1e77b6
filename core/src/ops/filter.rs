// brook/src/ops/filter.rs

//! Predicate filtering.
//!
//! A rejected value vanishes silently: it contributes no position, so it does
//! not count toward `limit` or `skip`. Absent positions are dropped unless
//! the node runs in nullable mode.

use std::sync::Arc;

use crate::error::BrookResult;
use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Consumer, Predicate, Producer};

pub(crate) enum FilterKind<T> {
  /// Predicate over values; absent positions are dropped.
  Values(Predicate<T>),
  /// Null-accepting predicate: sees every position, absent ones as `None`.
  Nullable(Arc<dyn Fn(Option<&T>) -> bool + Send + Sync>),
  /// No predicate at all: drops absent positions only.
  Compact,
}

impl<T> Clone for FilterKind<T> {
  fn clone(&self) -> Self {
    match self {
      FilterKind::Values(pred) => FilterKind::Values(pred.clone()),
      FilterKind::Nullable(pred) => FilterKind::Nullable(pred.clone()),
      FilterKind::Compact => FilterKind::Compact,
    }
  }
}

pub struct FilterOp<T> {
  upstream: Arc<dyn Producer<T>>,
  kind: FilterKind<T>,
}

impl<T> FilterOp<T> {
  pub fn values(upstream: Arc<dyn Producer<T>>, predicate: Predicate<T>) -> Self {
    Self { upstream, kind: FilterKind::Values(predicate) }
  }

  pub fn nullable(
    upstream: Arc<dyn Producer<T>>,
    predicate: Arc<dyn Fn(Option<&T>) -> bool + Send + Sync>,
  ) -> Self {
    Self { upstream, kind: FilterKind::Nullable(predicate) }
  }

  pub fn compact(upstream: Arc<dyn Producer<T>>) -> Self {
    Self { upstream, kind: FilterKind::Compact }
  }
}

impl<T: Clone + Send + Sync + 'static> Producer<T> for FilterOp<T> {
  fn subscribe(&self, consumer: BoxConsumer<T>) -> BoxHandle {
    self.upstream.subscribe(Box::new(FilterConsumer {
      downstream: consumer,
      kind: self.kind.clone(),
    }))
  }
}

struct FilterConsumer<T> {
  downstream: BoxConsumer<T>,
  kind: FilterKind<T>,
}

impl<T> Consumer<T> for FilterConsumer<T> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    let keep = match &self.kind {
      FilterKind::Values(pred) => pred(&value),
      FilterKind::Nullable(pred) => pred(Some(&value)),
      FilterKind::Compact => true,
    };
    if keep {
      self.downstream.next(value)
    } else {
      Ok(ChainControl::Continue)
    }
  }

  fn next_absent(&mut self) -> BrookResult<ChainControl> {
    let keep = match &self.kind {
      FilterKind::Values(_) | FilterKind::Compact => false,
      FilterKind::Nullable(pred) => pred(None),
    };
    if keep {
      self.downstream.next_absent()
    } else {
      Ok(ChainControl::Continue)
    }
  }

  fn on_complete(&mut self) {
    self.downstream.on_complete();
  }

  fn on_cancelled(&mut self) {
    self.downstream.on_cancelled();
  }

  fn on_error(&mut self, error: anyhow::Error) -> BrookResult<ChainControl> {
    self.downstream.on_error(error)
  }
}
