// brook/src/source/values.rs

//! Finite, order-preserving sources.

use std::sync::Arc;

use tracing::{event, Level};

use super::SourceState;
use crate::error::BrookResult;
use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Demand, Handle, Producer};

/// Source over a finite ordered collection of positions. `None` slots are
/// real absent positions and are delivered through `next_absent`.
pub struct ValuesProducer<T> {
  items: Arc<Vec<Option<T>>>,
}

impl<T> ValuesProducer<T> {
  pub fn new(items: Vec<Option<T>>) -> Self {
    Self { items: Arc::new(items) }
  }
}

impl<T: Clone + Send + Sync + 'static> Producer<T> for ValuesProducer<T> {
  fn subscribe(&self, consumer: BoxConsumer<T>) -> BoxHandle {
    Box::new(ValuesHandle {
      items: self.items.clone(),
      cursor: 0,
      consumer,
      state: SourceState::Active,
    })
  }
}

struct ValuesHandle<T> {
  items: Arc<Vec<Option<T>>>,
  cursor: usize,
  consumer: BoxConsumer<T>,
  state: SourceState,
}

impl<T: Clone> ValuesHandle<T> {
  fn emit_one(&mut self) -> BrookResult<()> {
    match self.items.get(self.cursor) {
      None => {
        self.state = SourceState::Completed;
        event!(Level::TRACE, emitted = self.cursor, "finite source exhausted");
        self.consumer.on_complete();
      }
      Some(slot) => {
        self.cursor += 1;
        let control = match slot {
          Some(value) => self.consumer.next(value.clone())?,
          None => self.consumer.next_absent()?,
        };
        if control == ChainControl::Stop {
          self.state = SourceState::Cancelled;
          event!(Level::TRACE, position = self.cursor, "finite source stopped by downstream");
          self.consumer.on_cancelled();
        }
      }
    }
    Ok(())
  }
}

impl<T: Clone> Handle for ValuesHandle<T> {
  fn request(&mut self, demand: Demand) -> BrookResult<()> {
    if self.state != SourceState::Active {
      return Ok(());
    }
    match demand {
      Demand::FetchOne | Demand::DropThenFetch(_) => self.emit_one(),
      Demand::DrainAll => {
        while self.state == SourceState::Active {
          self.emit_one()?;
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

/// The empty chain: completes on the first pull without producing anything.
pub struct EmptyProducer;

impl<T: 'static> Producer<T> for EmptyProducer {
  fn subscribe(&self, consumer: BoxConsumer<T>) -> BoxHandle {
    Box::new(EmptyHandle { consumer, state: SourceState::Active })
  }
}

struct EmptyHandle<T> {
  consumer: BoxConsumer<T>,
  state: SourceState,
}

impl<T> Handle for EmptyHandle<T> {
  fn request(&mut self, _demand: Demand) -> BrookResult<()> {
    if self.state == SourceState::Active {
      self.state = SourceState::Completed;
      self.consumer.on_complete();
    }
    Ok(())
  }

  fn cancel(&mut self) {
    if self.state == SourceState::Active {
      self.state = SourceState::Cancelled;
      self.consumer.on_cancelled();
    }
  }
}
