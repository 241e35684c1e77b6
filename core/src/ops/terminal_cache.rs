// brook/src/ops/terminal_cache.rs

//! Buffer-then-replay: fully drains the upstream into an ordered buffer of
//! positions, applies a transform to the buffered collection, then re-exposes
//! the result as a fresh bounded source for downstream demand. Unbounded
//! upstreams fail the drain instead of hanging. `distinct` and `sorted` are
//! built on this node.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use tracing::{event, Level};

use crate::error::BrookResult;
use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Consumer, Demand, Handle, Producer};

pub type BufferTransform<T> = Arc<dyn Fn(Vec<Option<T>>) -> Vec<Option<T>> + Send + Sync>;

pub struct BufferedOp<T> {
  upstream: Arc<dyn Producer<T>>,
  transform: BufferTransform<T>,
}

impl<T> BufferedOp<T> {
  pub fn new(upstream: Arc<dyn Producer<T>>, transform: BufferTransform<T>) -> Self {
    Self { upstream, transform }
  }
}

impl<T: Clone + Send + Sync + 'static> Producer<T> for BufferedOp<T> {
  fn subscribe(&self, consumer: BoxConsumer<T>) -> BoxHandle {
    let core = Rc::new(RefCell::new(BufferedCore {
      downstream: consumer,
      phase: CachePhase::Collecting(Vec::new()),
      transform: self.transform.clone(),
    }));
    let upstream = self.upstream.subscribe(Box::new(BufferedFeed { core: core.clone() }));
    Box::new(BufferedHandle { upstream, core, drained: false })
  }
}

enum CachePhase<T> {
  Collecting(Vec<Option<T>>),
  Replaying(std::vec::IntoIter<Option<T>>),
  Finished,
}

struct BufferedCore<T> {
  downstream: BoxConsumer<T>,
  phase: CachePhase<T>,
  transform: BufferTransform<T>,
}

impl<T> BufferedCore<T> {
  /// Upstream is over: run the transform and switch to replay.
  fn seal(&mut self) {
    if let CachePhase::Collecting(buffer) = std::mem::replace(&mut self.phase, CachePhase::Finished) {
      let collected = buffer.len();
      let replay = (self.transform)(buffer);
      event!(Level::TRACE, collected, replayed = replay.len(), "terminal cache sealed");
      self.phase = CachePhase::Replaying(replay.into_iter());
    }
  }
}

struct BufferedFeed<T> {
  core: Rc<RefCell<BufferedCore<T>>>,
}

impl<T> Consumer<T> for BufferedFeed<T> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    if let CachePhase::Collecting(buffer) = &mut self.core.borrow_mut().phase {
      buffer.push(Some(value));
    }
    Ok(ChainControl::Continue)
  }

  fn next_absent(&mut self) -> BrookResult<ChainControl> {
    if let CachePhase::Collecting(buffer) = &mut self.core.borrow_mut().phase {
      buffer.push(None);
    }
    Ok(ChainControl::Continue)
  }

  fn on_complete(&mut self) {
    self.core.borrow_mut().seal();
  }

  fn on_cancelled(&mut self) {
    // A cancelled upstream still yields a cache of everything seen so far.
    self.core.borrow_mut().seal();
  }

  fn on_error(&mut self, error: anyhow::Error) -> BrookResult<ChainControl> {
    self.core.borrow_mut().downstream.on_error(error)
  }
}

struct BufferedHandle<T> {
  upstream: BoxHandle,
  core: Rc<RefCell<BufferedCore<T>>>,
  drained: bool,
}

impl<T> BufferedHandle<T> {
  fn replay_one(&mut self) -> BrookResult<()> {
    let mut core = self.core.borrow_mut();
    let slot = match &mut core.phase {
      CachePhase::Replaying(replay) => replay.next(),
      _ => return Ok(()),
    };
    match slot {
      None => {
        core.phase = CachePhase::Finished;
        core.downstream.on_complete();
      }
      Some(slot) => {
        let control = match slot {
          Some(value) => core.downstream.next(value)?,
          None => core.downstream.next_absent()?,
        };
        if control == ChainControl::Stop {
          core.phase = CachePhase::Finished;
          core.downstream.on_cancelled();
        }
      }
    }
    Ok(())
  }
}

impl<T> Handle for BufferedHandle<T> {
  fn request(&mut self, demand: Demand) -> BrookResult<()> {
    if !self.drained {
      self.drained = true;
      self.upstream.request(Demand::DrainAll)?;
    }
    match demand {
      Demand::FetchOne | Demand::DropThenFetch(_) => self.replay_one(),
      Demand::DrainAll => {
        while matches!(self.core.borrow().phase, CachePhase::Replaying(_)) {
          self.replay_one()?;
        }
        Ok(())
      }
    }
  }

  fn cancel(&mut self) {
    let mut core = self.core.borrow_mut();
    if !matches!(core.phase, CachePhase::Finished) {
      core.phase = CachePhase::Finished;
      core.downstream.on_cancelled();
    }
  }
}
