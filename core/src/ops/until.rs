// brook/src/ops/until.rs

//! Predicate-delimited prefixes and suffixes.
//!
//! `TakeUntilOp` forwards positions until the first value satisfying the
//! predicate, then stops the upstream; the satisfying value itself is not
//! forwarded. `DropUntilOp` discards positions until the first satisfying
//! value and forwards from that value on. Absent positions never satisfy a
//! predicate: they are forwarded while taking and discarded while dropping.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::BrookResult;
use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Consumer, Demand, Handle, Predicate, Producer};

pub struct TakeUntilOp<T> {
  upstream: Arc<dyn Producer<T>>,
  predicate: Predicate<T>,
}

impl<T> TakeUntilOp<T> {
  pub fn new(upstream: Arc<dyn Producer<T>>, predicate: Predicate<T>) -> Self {
    Self { upstream, predicate }
  }
}

impl<T: Clone + Send + Sync + 'static> Producer<T> for TakeUntilOp<T> {
  fn subscribe(&self, consumer: BoxConsumer<T>) -> BoxHandle {
    self.upstream.subscribe(Box::new(TakeUntilConsumer {
      downstream: consumer,
      predicate: self.predicate.clone(),
    }))
  }
}

struct TakeUntilConsumer<T> {
  downstream: BoxConsumer<T>,
  predicate: Predicate<T>,
}

impl<T> Consumer<T> for TakeUntilConsumer<T> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    if (self.predicate)(&value) {
      return Ok(ChainControl::Stop);
    }
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

pub struct DropUntilOp<T> {
  upstream: Arc<dyn Producer<T>>,
  predicate: Predicate<T>,
}

impl<T> DropUntilOp<T> {
  pub fn new(upstream: Arc<dyn Producer<T>>, predicate: Predicate<T>) -> Self {
    Self { upstream, predicate }
  }
}

impl<T: Clone + Send + Sync + 'static> Producer<T> for DropUntilOp<T> {
  fn subscribe(&self, consumer: BoxConsumer<T>) -> BoxHandle {
    let core = Rc::new(RefCell::new(DropUntilCore {
      downstream: consumer,
      dropping: true,
      ended: false,
    }));
    let upstream = self.upstream.subscribe(Box::new(DropUntilFeed {
      core: core.clone(),
      predicate: self.predicate.clone(),
    }));
    Box::new(DropUntilHandle { upstream, core })
  }
}

struct DropUntilCore<T> {
  downstream: BoxConsumer<T>,
  dropping: bool,
  ended: bool,
}

struct DropUntilFeed<T> {
  core: Rc<RefCell<DropUntilCore<T>>>,
  predicate: Predicate<T>,
}

impl<T> Consumer<T> for DropUntilFeed<T> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    let mut core = self.core.borrow_mut();
    if core.dropping {
      if !(self.predicate)(&value) {
        return Ok(ChainControl::Continue);
      }
      // The first satisfying value ends the drop phase and is forwarded.
      core.dropping = false;
    }
    core.downstream.next(value)
  }

  fn next_absent(&mut self) -> BrookResult<ChainControl> {
    let mut core = self.core.borrow_mut();
    if core.dropping {
      return Ok(ChainControl::Continue);
    }
    core.downstream.next_absent()
  }

  fn on_complete(&mut self) {
    let mut core = self.core.borrow_mut();
    core.ended = true;
    core.downstream.on_complete();
  }

  fn on_cancelled(&mut self) {
    let mut core = self.core.borrow_mut();
    core.ended = true;
    core.downstream.on_cancelled();
  }

  fn on_error(&mut self, error: anyhow::Error) -> BrookResult<ChainControl> {
    self.core.borrow_mut().downstream.on_error(error)
  }
}

struct DropUntilHandle<T> {
  upstream: BoxHandle,
  core: Rc<RefCell<DropUntilCore<T>>>,
}

impl<T> Handle for DropUntilHandle<T> {
  fn request(&mut self, demand: Demand) -> BrookResult<()> {
    if demand != Demand::DrainAll {
      // Pull through the drop phase; the pull that ends it already delivers
      // the first forwarded value downstream.
      loop {
        {
          let core = self.core.borrow();
          if core.ended {
            return Ok(());
          }
          if !core.dropping {
            break;
          }
        }
        self.upstream.request(Demand::DropThenFetch(0))?;
        let core = self.core.borrow();
        if !core.dropping || core.ended {
          return Ok(());
        }
      }
    }
    self.upstream.request(demand)
  }

  fn cancel(&mut self) {
    self.upstream.cancel();
  }
}
