// brook/src/ops/flat_map.rs

//! Nested-sequence flattening.
//!
//! Every upstream value is mapped to an inner cursor whose elements are all
//! forwarded before the next outer element is pulled. Two execution modes:
//! under `DrainAll` each inner cursor is exhausted eagerly with a forward
//! loop; under one-at-a-time demand the node parks the cursor in its state
//! machine and serves exactly one inner element per pull.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use tracing::{event, Level};

use crate::error::BrookResult;
use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Consumer, Demand, Handle, Producer};

pub type InnerCursor<R> = Box<dyn Iterator<Item = R>>;
pub type FlatMapper<T, R> = Arc<dyn Fn(T) -> InnerCursor<R> + Send + Sync>;

pub struct FlatMapOp<T, R> {
  upstream: Arc<dyn Producer<T>>,
  mapper: FlatMapper<T, R>,
}

impl<T, R> FlatMapOp<T, R> {
  pub fn new(upstream: Arc<dyn Producer<T>>, mapper: FlatMapper<T, R>) -> Self {
    Self { upstream, mapper }
  }
}

impl<T, R> Producer<R> for FlatMapOp<T, R>
where
  T: Clone + Send + Sync + 'static,
  R: Clone + Send + Sync + 'static,
{
  fn subscribe(&self, consumer: BoxConsumer<R>) -> BoxHandle {
    let core = Rc::new(RefCell::new(FlatMapCore {
      downstream: consumer,
      state: InnerState::AwaitingOuter,
      demand: Demand::FetchOne,
      ended: false,
    }));
    let upstream = self.upstream.subscribe(Box::new(FlatMapFeed {
      core: core.clone(),
      mapper: self.mapper.clone(),
    }));
    Box::new(FlatMapHandle { upstream, core })
  }
}

/// State machine of one live flat-map node.
enum InnerState<R> {
  /// No inner cursor active; the next pull goes upstream.
  AwaitingOuter,
  /// An inner cursor is being served one element per pull.
  DrainingInner(InnerCursor<R>),
}

struct FlatMapCore<R> {
  downstream: BoxConsumer<R>,
  state: InnerState<R>,
  /// Memo of the demand driving the current upstream pull, so the feed knows
  /// which execution mode applies when the outer element arrives.
  demand: Demand,
  ended: bool,
}

struct FlatMapFeed<T, R> {
  core: Rc<RefCell<FlatMapCore<R>>>,
  mapper: FlatMapper<T, R>,
}

impl<T, R> Consumer<T> for FlatMapFeed<T, R> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    let mut cursor = (self.mapper)(value);
    let mut core = self.core.borrow_mut();
    if core.demand == Demand::DrainAll {
      // Terminal drain: exhaust the inner cursor eagerly.
      for item in cursor {
        if core.downstream.next(item)? == ChainControl::Stop {
          return Ok(ChainControl::Stop);
        }
      }
      return Ok(ChainControl::Continue);
    }
    match cursor.next() {
      // An empty inner cursor contributes no position.
      None => Ok(ChainControl::Continue),
      Some(first) => {
        let control = core.downstream.next(first)?;
        if control == ChainControl::Continue {
          core.state = InnerState::DrainingInner(cursor);
        }
        Ok(control)
      }
    }
  }

  fn next_absent(&mut self) -> BrookResult<ChainControl> {
    // An absent outer position provides no inner cursor.
    Ok(ChainControl::Continue)
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

struct FlatMapHandle<R> {
  upstream: BoxHandle,
  core: Rc<RefCell<FlatMapCore<R>>>,
}

/// Outcome of trying to serve a pull from the parked inner cursor.
enum Served {
  /// One inner element was delivered; the pull is satisfied.
  Delivered,
  /// The downstream asked to stop mid-inner; the upstream must cancel.
  Stopped,
  /// No inner cursor is active (or it just exhausted); pull upstream.
  PullUpstream,
}

impl<R> Handle for FlatMapHandle<R> {
  fn request(&mut self, demand: Demand) -> BrookResult<()> {
    let served = {
      let mut guard = self.core.borrow_mut();
      let core = &mut *guard;
      if core.ended {
        return Ok(());
      }
      if let InnerState::DrainingInner(cursor) = &mut core.state {
        // The incremental barricade never accepts a drain demand; recover by
        // finishing the inner cursor before handing the drain upstream.
        debug_assert!(
          demand != Demand::DrainAll,
          "drain demanded while an inner cursor is active"
        );
        if demand == Demand::DrainAll {
          event!(Level::DEBUG, "draining a parked inner cursor before a drain demand");
          let mut outcome = Served::PullUpstream;
          while let Some(item) = cursor.next() {
            if core.downstream.next(item)? == ChainControl::Stop {
              outcome = Served::Stopped;
              break;
            }
          }
          core.state = InnerState::AwaitingOuter;
          outcome
        } else {
          match cursor.next() {
            Some(item) => {
              if core.downstream.next(item)? == ChainControl::Stop {
                core.state = InnerState::AwaitingOuter;
                Served::Stopped
              } else {
                Served::Delivered
              }
            }
            None => {
              // Inner exhausted; control returns upstream for the next
              // outer element.
              core.state = InnerState::AwaitingOuter;
              Served::PullUpstream
            }
          }
        }
      } else {
        Served::PullUpstream
      }
    };
    match served {
      Served::Delivered => Ok(()),
      Served::Stopped => {
        self.upstream.cancel();
        Ok(())
      }
      Served::PullUpstream => {
        self.core.borrow_mut().demand = demand;
        self.upstream.request(demand)
      }
    }
  }

  fn cancel(&mut self) {
    self.upstream.cancel();
  }
}
