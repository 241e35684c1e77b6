// brook/src/ops/inspect.rs

//! Pass-through observation and hard per-element assertions.

use std::sync::Arc;

use crate::error::{BrookError, BrookResult};
use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Consumer, Predicate, Producer};

pub type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Observes each value without consuming it. Absent positions pass silently.
pub struct InspectOp<T> {
  upstream: Arc<dyn Producer<T>>,
  observer: Observer<T>,
}

impl<T> InspectOp<T> {
  pub fn new(upstream: Arc<dyn Producer<T>>, observer: Observer<T>) -> Self {
    Self { upstream, observer }
  }
}

impl<T: Clone + Send + Sync + 'static> Producer<T> for InspectOp<T> {
  fn subscribe(&self, consumer: BoxConsumer<T>) -> BoxHandle {
    self.upstream.subscribe(Box::new(InspectConsumer {
      downstream: consumer,
      observer: self.observer.clone(),
    }))
  }
}

struct InspectConsumer<T> {
  downstream: BoxConsumer<T>,
  observer: Observer<T>,
}

impl<T> Consumer<T> for InspectConsumer<T> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    (self.observer)(&value);
    self.downstream.next(value)
  }

  fn next_absent(&mut self) -> BrookResult<ChainControl> {
    self.downstream.next_absent()
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

/// Hard assertion on every position: a value failing the predicate, or any
/// absent position, aborts the whole evaluation.
pub struct AssertEachOp<T> {
  upstream: Arc<dyn Producer<T>>,
  predicate: Predicate<T>,
  message: Arc<str>,
}

impl<T> AssertEachOp<T> {
  pub fn new(upstream: Arc<dyn Producer<T>>, predicate: Predicate<T>, message: Arc<str>) -> Self {
    Self { upstream, predicate, message }
  }
}

impl<T: Clone + Send + Sync + 'static> Producer<T> for AssertEachOp<T> {
  fn subscribe(&self, consumer: BoxConsumer<T>) -> BoxHandle {
    self.upstream.subscribe(Box::new(AssertEachConsumer {
      downstream: consumer,
      predicate: self.predicate.clone(),
      message: self.message.clone(),
    }))
  }
}

struct AssertEachConsumer<T> {
  downstream: BoxConsumer<T>,
  predicate: Predicate<T>,
  message: Arc<str>,
}

impl<T> Consumer<T> for AssertEachConsumer<T> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    if !(self.predicate)(&value) {
      return Err(BrookError::Assertion { message: self.message.to_string() });
    }
    self.downstream.next(value)
  }

  fn next_absent(&mut self) -> BrookResult<ChainControl> {
    Err(BrookError::Assertion {
      message: format!("{} (absent position)", self.message),
    })
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
