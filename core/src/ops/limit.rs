// brook/src/ops/limit.rs

//! Caps a chain at `max` positions, then stops the upstream.
//!
//! Absent positions count toward the cap even though the default terminal
//! view later drops them: `of_nullable([1, ∅, 2, 3]).limit(3)` holds three
//! positions but has a default size of two. Downstream callers depend on
//! this asymmetry.
//!
//! The node downgrades `DrainAll` into a bounded pull loop, which is what
//! makes it the primary safe way to consume an unbounded generator.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::BrookResult;
use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Consumer, Demand, Handle, Producer};

pub struct LimitOp<T> {
  upstream: Arc<dyn Producer<T>>,
  max: usize,
}

impl<T> LimitOp<T> {
  pub fn new(upstream: Arc<dyn Producer<T>>, max: usize) -> Self {
    Self { upstream, max }
  }
}

impl<T: Clone + Send + Sync + 'static> Producer<T> for LimitOp<T> {
  fn subscribe(&self, consumer: BoxConsumer<T>) -> BoxHandle {
    let core = Rc::new(RefCell::new(LimitCore {
      downstream: consumer,
      remaining: self.max,
      finished: false,
    }));
    let upstream = self.upstream.subscribe(Box::new(LimitFeed { core: core.clone() }));
    Box::new(LimitHandle { upstream, core })
  }
}

struct LimitCore<T> {
  downstream: BoxConsumer<T>,
  remaining: usize,
  /// The downstream already received its terminal signal.
  finished: bool,
}

struct LimitFeed<T> {
  core: Rc<RefCell<LimitCore<T>>>,
}

impl<T> LimitFeed<T> {
  fn deliver(&mut self, slot: Option<T>) -> BrookResult<ChainControl> {
    let mut core = self.core.borrow_mut();
    if core.remaining == 0 {
      return Ok(ChainControl::Stop);
    }
    core.remaining -= 1;
    let control = match slot {
      Some(value) => core.downstream.next(value)?,
      None => core.downstream.next_absent()?,
    };
    if core.remaining == 0 {
      // Cap reached: stop the upstream regardless of what downstream said.
      return Ok(ChainControl::Stop);
    }
    Ok(control)
  }
}

impl<T> Consumer<T> for LimitFeed<T> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    self.deliver(Some(value))
  }

  fn next_absent(&mut self) -> BrookResult<ChainControl> {
    self.deliver(None)
  }

  fn on_complete(&mut self) {
    let mut core = self.core.borrow_mut();
    if !core.finished {
      core.finished = true;
      core.downstream.on_complete();
    }
  }

  fn on_cancelled(&mut self) {
    let mut core = self.core.borrow_mut();
    if !core.finished {
      core.finished = true;
      core.downstream.on_cancelled();
    }
  }

  fn on_error(&mut self, error: anyhow::Error) -> BrookResult<ChainControl> {
    self.core.borrow_mut().downstream.on_error(error)
  }
}

struct LimitHandle<T> {
  upstream: BoxHandle,
  core: Rc<RefCell<LimitCore<T>>>,
}

impl<T> Handle for LimitHandle<T> {
  fn request(&mut self, demand: Demand) -> BrookResult<()> {
    {
      let mut core = self.core.borrow_mut();
      if core.finished {
        return Ok(());
      }
      if core.remaining == 0 {
        // A zero cap completes without ever touching the upstream.
        core.finished = true;
        core.downstream.on_complete();
        drop(core);
        self.upstream.cancel();
        return Ok(());
      }
    }
    match demand {
      Demand::DrainAll => {
        loop {
          {
            let core = self.core.borrow();
            if core.finished || core.remaining == 0 {
              break;
            }
          }
          self.upstream.request(Demand::FetchOne)?;
        }
        Ok(())
      }
      other => self.upstream.request(other),
    }
  }

  fn cancel(&mut self) {
    self.upstream.cancel();
  }
}
