// brook/src/ops/skip.rs

//! Drops the first `count` positions (absent positions included), then
//! forwards the remainder unchanged. While skipping, pulls are rewritten to
//! `DropThenFetch` so generator sources can bound the drop with their budget.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::BrookResult;
use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Consumer, Demand, Handle, Producer};

pub struct SkipOp<T> {
  upstream: Arc<dyn Producer<T>>,
  count: usize,
}

impl<T> SkipOp<T> {
  pub fn new(upstream: Arc<dyn Producer<T>>, count: usize) -> Self {
    Self { upstream, count }
  }
}

impl<T: Clone + Send + Sync + 'static> Producer<T> for SkipOp<T> {
  fn subscribe(&self, consumer: BoxConsumer<T>) -> BoxHandle {
    let core = Rc::new(RefCell::new(SkipCore {
      downstream: consumer,
      to_skip: self.count,
      ended: false,
    }));
    let upstream = self.upstream.subscribe(Box::new(SkipFeed { core: core.clone() }));
    Box::new(SkipHandle { upstream, core })
  }
}

struct SkipCore<T> {
  downstream: BoxConsumer<T>,
  to_skip: usize,
  ended: bool,
}

struct SkipFeed<T> {
  core: Rc<RefCell<SkipCore<T>>>,
}

impl<T> SkipFeed<T> {
  fn deliver(&mut self, slot: Option<T>) -> BrookResult<ChainControl> {
    let mut core = self.core.borrow_mut();
    if core.to_skip > 0 {
      core.to_skip -= 1;
      return Ok(ChainControl::Continue);
    }
    match slot {
      Some(value) => core.downstream.next(value),
      None => core.downstream.next_absent(),
    }
  }
}

impl<T> Consumer<T> for SkipFeed<T> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    self.deliver(Some(value))
  }

  fn next_absent(&mut self) -> BrookResult<ChainControl> {
    self.deliver(None)
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

struct SkipHandle<T> {
  upstream: BoxHandle,
  core: Rc<RefCell<SkipCore<T>>>,
}

impl<T> Handle for SkipHandle<T> {
  fn request(&mut self, demand: Demand) -> BrookResult<()> {
    if demand != Demand::DrainAll {
      // Work off the skip phase first; each pull drops exactly one position.
      loop {
        let pending = {
          let core = self.core.borrow();
          if core.ended {
            return Ok(());
          }
          core.to_skip
        };
        if pending == 0 {
          break;
        }
        self.upstream.request(Demand::DropThenFetch(pending))?;
      }
    }
    self.upstream.request(demand)
  }

  fn cancel(&mut self) {
    self.upstream.cancel();
  }
}
