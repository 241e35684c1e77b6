// brook/src/ops/map.rs

//! Per-element transformation. The plain mapper never sees absent positions;
//! they travel past it unchanged. The nullable mapper controls every
//! position and may turn values absent or absent positions into values.

use std::sync::Arc;

use crate::error::BrookResult;
use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Consumer, Producer};

pub type Mapper<T, R> = Arc<dyn Fn(T) -> R + Send + Sync>;
pub type NullableMapper<T, R> = Arc<dyn Fn(Option<T>) -> Option<R> + Send + Sync>;

pub struct MapOp<T, R> {
  upstream: Arc<dyn Producer<T>>,
  mapper: Mapper<T, R>,
}

impl<T, R> MapOp<T, R> {
  pub fn new(upstream: Arc<dyn Producer<T>>, mapper: Mapper<T, R>) -> Self {
    Self { upstream, mapper }
  }
}

impl<T, R> Producer<R> for MapOp<T, R>
where
  T: Clone + Send + Sync + 'static,
  R: Clone + Send + Sync + 'static,
{
  fn subscribe(&self, consumer: BoxConsumer<R>) -> BoxHandle {
    self.upstream.subscribe(Box::new(MapConsumer {
      downstream: consumer,
      mapper: self.mapper.clone(),
    }))
  }
}

struct MapConsumer<T, R> {
  downstream: BoxConsumer<R>,
  mapper: Mapper<T, R>,
}

impl<T, R> Consumer<T> for MapConsumer<T, R> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    self.downstream.next((self.mapper)(value))
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

pub struct MapNullableOp<T, R> {
  upstream: Arc<dyn Producer<T>>,
  mapper: NullableMapper<T, R>,
}

impl<T, R> MapNullableOp<T, R> {
  pub fn new(upstream: Arc<dyn Producer<T>>, mapper: NullableMapper<T, R>) -> Self {
    Self { upstream, mapper }
  }
}

impl<T, R> Producer<R> for MapNullableOp<T, R>
where
  T: Clone + Send + Sync + 'static,
  R: Clone + Send + Sync + 'static,
{
  fn subscribe(&self, consumer: BoxConsumer<R>) -> BoxHandle {
    self.upstream.subscribe(Box::new(MapNullableConsumer {
      downstream: consumer,
      mapper: self.mapper.clone(),
    }))
  }
}

struct MapNullableConsumer<T, R> {
  downstream: BoxConsumer<R>,
  mapper: NullableMapper<T, R>,
}

impl<T, R> MapNullableConsumer<T, R> {
  fn deliver(&mut self, slot: Option<T>) -> BrookResult<ChainControl> {
    match (self.mapper)(slot) {
      Some(mapped) => self.downstream.next(mapped),
      None => self.downstream.next_absent(),
    }
  }
}

impl<T, R> Consumer<T> for MapNullableConsumer<T, R> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    self.deliver(Some(value))
  }

  fn next_absent(&mut self) -> BrookResult<ChainControl> {
    self.deliver(None)
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
