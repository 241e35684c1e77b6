// brook/src/ops/cast.rs

//! Cast-and-filter-by-type over dynamically typed chains.
//!
//! Values downcastable to the target type are forwarded as that type; values
//! of any other type are removed (no position). Absent positions are kept.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::BrookResult;
use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Consumer, Producer};

/// Element type of dynamically typed chains.
pub type AnyValue = Arc<dyn Any + Send + Sync>;

pub struct CastOp<R> {
  upstream: Arc<dyn Producer<AnyValue>>,
  _target: PhantomData<fn() -> R>,
}

impl<R> CastOp<R> {
  pub fn new(upstream: Arc<dyn Producer<AnyValue>>) -> Self {
    Self { upstream, _target: PhantomData }
  }
}

impl<R: Clone + Send + Sync + 'static> Producer<R> for CastOp<R> {
  fn subscribe(&self, consumer: BoxConsumer<R>) -> BoxHandle {
    self.upstream.subscribe(Box::new(CastConsumer {
      downstream: consumer,
      _target: PhantomData::<fn() -> R>,
    }))
  }
}

struct CastConsumer<R> {
  downstream: BoxConsumer<R>,
  _target: PhantomData<fn() -> R>,
}

impl<R: Clone + 'static> Consumer<AnyValue> for CastConsumer<R> {
  fn next(&mut self, value: AnyValue) -> BrookResult<ChainControl> {
    match value.downcast_ref::<R>() {
      Some(cast) => self.downstream.next(cast.clone()),
      None => Ok(ChainControl::Continue),
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
