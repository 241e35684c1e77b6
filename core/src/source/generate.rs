// brook/src/source/generate.rs

//! Unbounded generator sources.
//!
//! A generator wraps a stateful `produce next` closure. The closure is shared
//! by every subscription of the same chain, so consuming a generator-backed
//! chain twice continues where the first consumption stopped. Generators
//! never complete on their own; operators that need a bounded upstream fail
//! with [`BrookError::Unbounded`] instead of hanging.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{event, Level};

use super::SourceState;
use crate::error::{BrookError, BrookResult};
use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Demand, Handle, Producer};

/// Drop-phase pulls a single subscription may spend before the source
/// declares the drop unbounded.
pub const DROP_BUDGET: usize = 4096;

type GeneratorFn<T> = Box<dyn FnMut() -> T + Send>;

/// Source flagged as potentially unbounded.
pub struct GenerateProducer<T> {
  supply: Arc<Mutex<GeneratorFn<T>>>,
}

impl<T> GenerateProducer<T> {
  pub fn new(supply: impl FnMut() -> T + Send + 'static) -> Self {
    Self {
      supply: Arc::new(Mutex::new(Box::new(supply))),
    }
  }
}

impl<T: Clone + Send + Sync + 'static> Producer<T> for GenerateProducer<T> {
  fn subscribe(&self, consumer: BoxConsumer<T>) -> BoxHandle {
    Box::new(GenerateHandle {
      supply: self.supply.clone(),
      consumer,
      drops_remaining: DROP_BUDGET,
      state: SourceState::Active,
    })
  }
}

struct GenerateHandle<T> {
  supply: Arc<Mutex<GeneratorFn<T>>>,
  consumer: BoxConsumer<T>,
  drops_remaining: usize,
  state: SourceState,
}

impl<T: 'static> Handle for GenerateHandle<T> {
  fn request(&mut self, demand: Demand) -> BrookResult<()> {
    if self.state != SourceState::Active {
      return Ok(());
    }
    match demand {
      Demand::DrainAll => {
        event!(Level::DEBUG, "drain demanded against a generator source");
        Err(BrookError::Unbounded {
          detail: "a generator source cannot be drained to completion".to_string(),
        })
      }
      Demand::DropThenFetch(_) if self.drops_remaining == 0 => {
        event!(Level::DEBUG, budget = DROP_BUDGET, "generator drop budget exhausted");
        Err(BrookError::Unbounded {
          detail: format!("generator drop budget of {DROP_BUDGET} positions exhausted"),
        })
      }
      Demand::FetchOne | Demand::DropThenFetch(_) => {
        if demand.is_dropping() {
          self.drops_remaining -= 1;
        }
        let value = {
          let mut supply = self.supply.lock();
          (*supply)()
        };
        let control = self.consumer.next(value)?;
        if control == ChainControl::Stop {
          self.state = SourceState::Cancelled;
          event!(Level::TRACE, "generator source stopped by downstream");
          self.consumer.on_cancelled();
        }
        Ok(())
      }
    }
  }

  fn cancel(&mut self) {
    if self.state == SourceState::Active {
      self.state = SourceState::Cancelled;
      self.consumer.on_cancelled();
    }
  }
}
