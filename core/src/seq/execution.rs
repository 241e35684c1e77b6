// brook/src/seq/execution.rs

//! Contains the terminal surface of `Brook<T>`: the operations that actually
//! subscribe a consumer and demand elements. Results come out of single-slot
//! cells owned by the terminal functions; default terminal consumption drops
//! absent positions as an explicit final pass, never inside the chain.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::rc::Rc;

use tracing::{event, instrument, Level};

use super::definition::{Brook, ErrorChannel};
use super::iter::{Elements, Positions};
use crate::error::{BrookError, BrookResult};
use crate::maybe::Maybe;
use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Consumer, Demand, ErrorControl};

/// Routes element-level failures per the chain's error channel. Sits between
/// the chain and every terminal consumer, so a hook registered anywhere on
/// the facade observes failures from anywhere in the chain.
pub(crate) struct ChannelConsumer<T> {
  downstream: BoxConsumer<T>,
  channel: ErrorChannel,
}

impl<T> Consumer<T> for ChannelConsumer<T> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
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
    match &self.channel {
      ErrorChannel::Trace => {
        event!(Level::WARN, error = %error, "element-level failure; position resumed as absent");
        Ok(ChainControl::Continue)
      }
      ErrorChannel::Hook(hook) => match hook(&error) {
        ErrorControl::Resume => Ok(ChainControl::Continue),
        ErrorControl::Cancel => {
          event!(Level::DEBUG, error = %error, "error hook cancelled the chain");
          Ok(ChainControl::Stop)
        }
        ErrorControl::Abort => Err(BrookError::Element { source: error }),
      },
    }
  }
}

/// Single-slot buffer a terminal consumer writes into.
pub(crate) struct Cell<T> {
  pub(crate) buffer: VecDeque<Option<T>>,
  pub(crate) ended: bool,
}

impl<T> Cell<T> {
  fn new() -> Self {
    Self {
      buffer: VecDeque::new(),
      ended: false,
    }
  }
}

struct CellConsumer<T> {
  cell: Rc<RefCell<Cell<T>>>,
}

impl<T> Consumer<T> for CellConsumer<T> {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    self.cell.borrow_mut().buffer.push_back(Some(value));
    Ok(ChainControl::Continue)
  }

  fn next_absent(&mut self) -> BrookResult<ChainControl> {
    self.cell.borrow_mut().buffer.push_back(None);
    Ok(ChainControl::Continue)
  }

  fn on_complete(&mut self) {
    self.cell.borrow_mut().ended = true;
  }

  fn on_cancelled(&mut self) {
    self.cell.borrow_mut().ended = true;
  }

  fn on_error(&mut self, _error: anyhow::Error) -> BrookResult<ChainControl> {
    // The error channel upstream already ruled on the failure.
    Ok(ChainControl::Continue)
  }
}

/// A live evaluation: the handle plus the cell its consumer fills.
pub(crate) struct Drive<T> {
  cell: Rc<RefCell<Cell<T>>>,
  handle: BoxHandle,
}

impl<T> Drive<T> {
  /// Pulls until one position is available or the chain ends.
  /// `Ok(None)` is the end of the stream.
  pub(crate) fn next_position(&mut self) -> BrookResult<Option<Option<T>>> {
    loop {
      {
        let mut cell = self.cell.borrow_mut();
        if let Some(slot) = cell.buffer.pop_front() {
          return Ok(Some(slot));
        }
        if cell.ended {
          return Ok(None);
        }
      }
      self.handle.request(Demand::FetchOne)?;
    }
  }

  /// Demands the whole stream at once and takes every buffered position.
  fn drain(&mut self) -> BrookResult<Vec<Option<T>>> {
    self.handle.request(Demand::DrainAll)?;
    let mut cell = self.cell.borrow_mut();
    Ok(cell.buffer.drain(..).collect())
  }

  pub(crate) fn cancel(&mut self) {
    self.handle.cancel();
  }
}

impl<T> Brook<T>
where
  T: Clone + Send + Sync + 'static,
{
  /// Protocol-level subscription: wires `consumer` behind this chain's
  /// error channel and returns the driving handle.
  pub fn subscribe(&self, consumer: BoxConsumer<T>) -> BoxHandle {
    self.producer.subscribe(Box::new(ChannelConsumer {
      downstream: consumer,
      channel: self.channel.clone(),
    }))
  }

  pub(crate) fn drive(&self) -> Drive<T> {
    let cell = Rc::new(RefCell::new(Cell::new()));
    let handle = self.subscribe(Box::new(CellConsumer { cell: cell.clone() }));
    Drive { cell, handle }
  }

  // --- Terminal surface ---

  /// Materializes the chain into an ordered list of values, dropping absent
  /// positions. Fails on unbounded chains.
  #[instrument(
    name = "Brook::collect",
    skip_all,
    fields(element_type = %std::any::type_name::<T>()),
    err(Display)
  )]
  pub fn collect(&self) -> BrookResult<Vec<T>> {
    Ok(self.drive().drain()?.into_iter().flatten().collect())
  }

  /// Materializes every position, absent ones as `None`.
  pub fn collect_nullable(&self) -> BrookResult<Vec<Option<T>>> {
    self.drive().drain()
  }

  /// Number of values in the chain (absent positions excluded).
  #[instrument(
    name = "Brook::size",
    skip_all,
    fields(element_type = %std::any::type_name::<T>()),
    err(Display)
  )]
  pub fn size(&self) -> BrookResult<usize> {
    Ok(self.drive().drain()?.iter().filter(|slot| slot.is_some()).count())
  }

  /// Whether the chain holds at least one value.
  pub fn present(&self) -> BrookResult<bool> {
    Ok(self.first()?.is_present())
  }

  /// The first value, skipping absent positions. Pulls one position at a
  /// time and cancels as soon as a value arrives, so it is safe on
  /// unbounded chains that eventually produce one.
  pub fn first(&self) -> BrookResult<Maybe<T>> {
    let mut drive = self.drive();
    while let Some(slot) = drive.next_position()? {
      if let Some(value) = slot {
        drive.cancel();
        return Ok(Maybe::present(value));
      }
    }
    Ok(Maybe::absent())
  }

  /// The last value. Drains the chain, so unbounded chains fail.
  pub fn last(&self) -> BrookResult<Maybe<T>> {
    Ok(self.drive().drain()?.into_iter().flatten().last().into())
  }

  /// The first value at or after position `index`.
  pub fn nth(&self, index: usize) -> BrookResult<Maybe<T>> {
    self.skip(index).first()
  }

  /// Whether any value equals `probe`. Short-circuits on the first match.
  pub fn contains(&self, probe: &T) -> BrookResult<bool>
  where
    T: PartialEq,
  {
    let mut drive = self.drive();
    while let Some(slot) = drive.next_position()? {
      if slot.as_ref() == Some(probe) {
        drive.cancel();
        return Ok(true);
      }
    }
    Ok(false)
  }

  /// Reduction without a seed. Absent positions are skipped; an accumulator
  /// yielding `None` short-circuits the whole reduction to absent.
  pub fn reduce(&self, accumulator: impl Fn(T, T) -> Option<T>) -> BrookResult<Maybe<T>> {
    let mut drive = self.drive();
    let mut acc: Option<T> = None;
    while let Some(slot) = drive.next_position()? {
      let Some(value) = slot else { continue };
      acc = match acc {
        None => Some(value),
        Some(current) => match accumulator(current, value) {
          Some(next) => Some(next),
          None => {
            drive.cancel();
            return Ok(Maybe::absent());
          }
        },
      };
    }
    Ok(acc.into())
  }

  /// Seeded reduction with the same short-circuit rule as [`Brook::reduce`].
  pub fn fold(&self, seed: T, accumulator: impl Fn(T, T) -> Option<T>) -> BrookResult<Maybe<T>> {
    let mut drive = self.drive();
    let mut acc = seed;
    while let Some(slot) = drive.next_position()? {
      let Some(value) = slot else { continue };
      match accumulator(acc, value) {
        Some(next) => acc = next,
        None => {
          drive.cancel();
          return Ok(Maybe::absent());
        }
      }
    }
    Ok(Maybe::present(acc))
  }

  /// Groups the values into a map. Later keys overwrite earlier ones;
  /// absent positions are skipped.
  pub fn to_map<K, V>(&self, key: impl Fn(&T) -> K, value: impl Fn(&T) -> V) -> BrookResult<HashMap<K, V>>
  where
    K: Eq + Hash,
  {
    let mut out = HashMap::new();
    for element in self.collect()? {
      out.insert(key(&element), value(&element));
    }
    Ok(out)
  }

  /// Performs `action` for every value, pulling one position at a time.
  pub fn for_each(&self, mut action: impl FnMut(T)) -> BrookResult<()> {
    let mut drive = self.drive();
    while let Some(slot) = drive.next_position()? {
      if let Some(value) = slot {
        action(value);
      }
    }
    Ok(())
  }

  /// Performs `action` for every position, absent ones as `None`.
  pub fn for_each_nullable(&self, mut action: impl FnMut(Option<T>)) -> BrookResult<()> {
    let mut drive = self.drive();
    while let Some(slot) = drive.next_position()? {
      action(slot);
    }
    Ok(())
  }

  /// Performs a fallible `action` for every value. Failures route through
  /// the chain's error channel like any other element-level failure.
  pub fn try_for_each(&self, action: impl Fn(T) -> anyhow::Result<()> + Send + Sync + 'static) -> BrookResult<()> {
    self.try_map(move |value| action(value)).for_each(|_| {})
  }

  /// Pull iterator over the values (absent positions skipped).
  pub fn iter(&self) -> Elements<T> {
    Elements::new(self.drive())
  }

  /// Pull iterator over every position, absent ones as `None`.
  pub fn iter_nullable(&self) -> Positions<T> {
    Positions::new(self.drive())
  }
}
