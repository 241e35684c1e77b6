// brook/src/ops/try_map.rs

//! Fallible per-element transformation.
//!
//! A failing mapper does not abort the chain by default: the failing
//! position is delivered as an absent placeholder, then the raw error is
//! sent down the chain for the error channel to judge. Whatever the verdict,
//! the failure is never dropped without a trace point.

use std::sync::Arc;

use crate::error::BrookResult;
use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Consumer, Producer};

pub type TryMapper<T, R> = Arc<dyn Fn(T) -> anyhow::Result<R> + Send + Sync>;

pub struct TryMapOp<T, R> {
  upstream: Arc<dyn Producer<T>>,
  mapper: TryMapper<T, R>,
}

impl<T, R> TryMapOp<T, R> {
  pub fn new(upstream: Arc<dyn Producer<T>>, mapper: TryMapper<T, R>) -> Self {
    Self { upstream, mapper }
  }
}

impl<T, R> Producer<R> for TryMapOp<T, R>
where
  T: Clone + Send + Sync + 'static,
  R: Clone + Send + Sync + 'static,
{
  fn subscribe(&self, consumer: BoxConsumer<R>) -> BoxHandle {
    self.upstream.subscribe(Box::new(TryMapConsumer {
      downstream: consumer,
      mapper: self.mapper.clone(),
    }))
  }
}

struct TryMapConsumer<T, R> {
  downstream: BoxConsumer<R>,
  mapper: TryMapper<T, R>,
}

impl<T, R> Consumer<T> for TryMapConsumer<T, R> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    match (self.mapper)(value) {
      Ok(mapped) => self.downstream.next(mapped),
      Err(error) => {
        // The failing position first, then the error.
        if self.downstream.next_absent()? == ChainControl::Stop {
          return Ok(ChainControl::Stop);
        }
        self.downstream.on_error(error)
      }
    }
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
