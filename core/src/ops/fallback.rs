// brook/src/ops/fallback.rs

//! Alternative-source fallback.
//!
//! On first demand the node probes the upstream until it sees a value or the
//! stream ends. A chain holding at least one value is replayed and then
//! continued live; a chain that ends with zero values (absent-only positions
//! count as zero) is abandoned in favor of the caller-supplied alternative.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use tracing::{event, Level};

use crate::error::BrookResult;
use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Consumer, Demand, Handle, Producer};

pub struct OrOp<T> {
  upstream: Arc<dyn Producer<T>>,
  alternative: Arc<dyn Producer<T>>,
}

impl<T> OrOp<T> {
  pub fn new(upstream: Arc<dyn Producer<T>>, alternative: Arc<dyn Producer<T>>) -> Self {
    Self { upstream, alternative }
  }
}

impl<T: Clone + Send + Sync + 'static> Producer<T> for OrOp<T> {
  fn subscribe(&self, consumer: BoxConsumer<T>) -> BoxHandle {
    let core = Rc::new(RefCell::new(OrCore {
      downstream: consumer,
      buffer: VecDeque::new(),
      decision: None,
      probe_ended: false,
      ended: false,
    }));
    let upstream = self.upstream.subscribe(Box::new(OrFeed { core: core.clone() }));
    Box::new(OrHandle {
      upstream,
      alternative: self.alternative.clone(),
      alt_handle: None,
      core,
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
  Original,
  Alternative,
}

struct OrCore<T> {
  downstream: BoxConsumer<T>,
  /// Positions seen while probing, replayed before going live.
  buffer: VecDeque<Option<T>>,
  decision: Option<Decision>,
  /// The upstream ended while the probe was still undecided.
  probe_ended: bool,
  ended: bool,
}

struct OrFeed<T> {
  core: Rc<RefCell<OrCore<T>>>,
}

impl<T> Consumer<T> for OrFeed<T> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    let mut core = self.core.borrow_mut();
    match core.decision {
      None => {
        // The first value decides for the original chain.
        core.buffer.push_back(Some(value));
        core.decision = Some(Decision::Original);
        Ok(ChainControl::Continue)
      }
      Some(Decision::Original) => core.downstream.next(value),
      Some(Decision::Alternative) => Ok(ChainControl::Continue),
    }
  }

  fn next_absent(&mut self) -> BrookResult<ChainControl> {
    let mut core = self.core.borrow_mut();
    match core.decision {
      None => {
        core.buffer.push_back(None);
        Ok(ChainControl::Continue)
      }
      Some(Decision::Original) => core.downstream.next_absent(),
      Some(Decision::Alternative) => Ok(ChainControl::Continue),
    }
  }

  fn on_complete(&mut self) {
    let mut core = self.core.borrow_mut();
    match core.decision {
      None => core.probe_ended = true,
      Some(Decision::Original) => {
        if !core.ended {
          core.ended = true;
          core.downstream.on_complete();
        }
      }
      Some(Decision::Alternative) => {}
    }
  }

  fn on_cancelled(&mut self) {
    let mut core = self.core.borrow_mut();
    match core.decision {
      None => core.probe_ended = true,
      Some(Decision::Original) => {
        if !core.ended {
          core.ended = true;
          core.downstream.on_cancelled();
        }
      }
      Some(Decision::Alternative) => {}
    }
  }

  fn on_error(&mut self, error: anyhow::Error) -> BrookResult<ChainControl> {
    self.core.borrow_mut().downstream.on_error(error)
  }
}

/// Relay for the alternative chain once the switch happened.
struct AltFeed<T> {
  core: Rc<RefCell<OrCore<T>>>,
}

impl<T> Consumer<T> for AltFeed<T> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    self.core.borrow_mut().downstream.next(value)
  }

  fn next_absent(&mut self) -> BrookResult<ChainControl> {
    self.core.borrow_mut().downstream.next_absent()
  }

  fn on_complete(&mut self) {
    let mut core = self.core.borrow_mut();
    if !core.ended {
      core.ended = true;
      core.downstream.on_complete();
    }
  }

  fn on_cancelled(&mut self) {
    let mut core = self.core.borrow_mut();
    if !core.ended {
      core.ended = true;
      core.downstream.on_cancelled();
    }
  }

  fn on_error(&mut self, error: anyhow::Error) -> BrookResult<ChainControl> {
    self.core.borrow_mut().downstream.on_error(error)
  }
}

struct OrHandle<T: Clone + Send + Sync + 'static> {
  upstream: BoxHandle,
  alternative: Arc<dyn Producer<T>>,
  alt_handle: Option<BoxHandle>,
  core: Rc<RefCell<OrCore<T>>>,
}

impl<T: Clone + Send + Sync + 'static> OrHandle<T> {
  fn decide(&mut self) -> BrookResult<()> {
    loop {
      {
        let core = self.core.borrow();
        if core.decision.is_some() {
          return Ok(());
        }
        if core.probe_ended {
          break;
        }
      }
      self.upstream.request(Demand::FetchOne)?;
    }
    // The chain ended with zero values: switch to the alternative.
    let mut core = self.core.borrow_mut();
    event!(Level::DEBUG, discarded = core.buffer.len(), "empty chain, switching to the alternative source");
    core.buffer.clear();
    core.decision = Some(Decision::Alternative);
    drop(core);
    let alt = self.alternative.subscribe(Box::new(AltFeed { core: self.core.clone() }));
    self.alt_handle = Some(alt);
    Ok(())
  }

  /// Serves one buffered position. Returns false when the buffer is empty.
  fn replay_one(&mut self) -> BrookResult<bool> {
    let mut core = self.core.borrow_mut();
    match core.buffer.pop_front() {
      None => Ok(false),
      Some(slot) => {
        let control = match slot {
          Some(value) => core.downstream.next(value)?,
          None => core.downstream.next_absent()?,
        };
        if control == ChainControl::Stop {
          drop(core);
          self.upstream.cancel();
        }
        Ok(true)
      }
    }
  }
}

impl<T: Clone + Send + Sync + 'static> Handle for OrHandle<T> {
  fn request(&mut self, demand: Demand) -> BrookResult<()> {
    if self.core.borrow().ended {
      return Ok(());
    }
    self.decide()?;
    let decision = self.core.borrow().decision;
    match decision {
      Some(Decision::Alternative) => {}
      _ => {
        match demand {
          Demand::FetchOne | Demand::DropThenFetch(_) => {
            if self.replay_one()? {
              return Ok(());
            }
            // The probe may have ended the upstream right after its value.
            if self.core.borrow().probe_ended {
              let mut core = self.core.borrow_mut();
              if !core.ended {
                core.ended = true;
                core.downstream.on_complete();
              }
              return Ok(());
            }
            return self.upstream.request(demand);
          }
          Demand::DrainAll => {
            while self.replay_one()? {}
            if self.core.borrow().probe_ended {
              let mut core = self.core.borrow_mut();
              if !core.ended {
                core.ended = true;
                core.downstream.on_complete();
              }
              return Ok(());
            }
            return self.upstream.request(Demand::DrainAll);
          }
        }
      }
    }
    match self.alt_handle.as_mut() {
      Some(alt) => alt.request(demand),
      None => Ok(()),
    }
  }

  fn cancel(&mut self) {
    match self.alt_handle.as_mut() {
      Some(alt) => alt.cancel(),
      None => self.upstream.cancel(),
    }
  }
}
