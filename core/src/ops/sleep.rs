// brook/src/ops/sleep.rs

//! Deliberate pacing: blocks the calling thread for a fixed duration before
//! forwarding every n-th pulled position. The only operator that stalls.

use std::sync::Arc;
use std::time::Duration;

use crate::error::BrookResult;
use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Consumer, Producer};

pub struct SleepOp<T> {
  upstream: Arc<dyn Producer<T>>,
  every: usize,
  duration: Duration,
}

impl<T> SleepOp<T> {
  pub fn new(upstream: Arc<dyn Producer<T>>, every: usize, duration: Duration) -> Self {
    Self {
      upstream,
      every: every.max(1),
      duration,
    }
  }
}

impl<T: Clone + Send + Sync + 'static> Producer<T> for SleepOp<T> {
  fn subscribe(&self, consumer: BoxConsumer<T>) -> BoxHandle {
    self.upstream.subscribe(Box::new(SleepConsumer {
      downstream: consumer,
      every: self.every,
      duration: self.duration,
      pulled: 0,
    }))
  }
}

struct SleepConsumer<T> {
  downstream: BoxConsumer<T>,
  every: usize,
  duration: Duration,
  pulled: usize,
}

impl<T> SleepConsumer<T> {
  fn pace(&mut self) {
    self.pulled += 1;
    if self.pulled % self.every == 0 {
      std::thread::sleep(self.duration);
    }
  }
}

impl<T> Consumer<T> for SleepConsumer<T> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    self.pace();
    self.downstream.next(value)
  }

  fn next_absent(&mut self) -> BrookResult<ChainControl> {
    self.pace();
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
