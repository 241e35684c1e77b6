// brook/src/ops/fill_absent.rs

//! Substitutes every absent position with a freshly supplied value. Values
//! pass through untouched. This is how error placeholders or real null
//! positions are turned back into elements.

use std::sync::Arc;

use crate::error::BrookResult;
use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Consumer, Producer};

pub type Supplier<T> = Arc<dyn Fn() -> T + Send + Sync>;

pub struct FillAbsentOp<T> {
  upstream: Arc<dyn Producer<T>>,
  supply: Supplier<T>,
}

impl<T> FillAbsentOp<T> {
  pub fn new(upstream: Arc<dyn Producer<T>>, supply: Supplier<T>) -> Self {
    Self { upstream, supply }
  }
}

impl<T: Clone + Send + Sync + 'static> Producer<T> for FillAbsentOp<T> {
  fn subscribe(&self, consumer: BoxConsumer<T>) -> BoxHandle {
    self.upstream.subscribe(Box::new(FillAbsentConsumer {
      downstream: consumer,
      supply: self.supply.clone(),
    }))
  }
}

struct FillAbsentConsumer<T> {
  downstream: BoxConsumer<T>,
  supply: Supplier<T>,
}

impl<T> Consumer<T> for FillAbsentConsumer<T> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    self.downstream.next(value)
  }

  fn next_absent(&mut self) -> BrookResult<ChainControl> {
    self.downstream.next((self.supply)())
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
