// brook/src/seq/definition.rs

//! Contains the `Brook<T>` facade definition: construction and the
//! transformation surface. A `Brook` is an immutable description of an
//! operator chain; no element moves until a terminal operation (see
//! `execution.rs`) subscribes a consumer and starts demanding.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use crate::ops::cast::{AnyValue, CastOp};
use crate::ops::fallback::OrOp;
use crate::ops::fill_absent::FillAbsentOp;
use crate::ops::filter::FilterOp;
use crate::ops::flat_map::{FlatMapOp, FlatMapper, InnerCursor};
use crate::ops::inspect::{AssertEachOp, InspectOp};
use crate::ops::limit::LimitOp;
use crate::ops::map::{MapNullableOp, MapOp};
use crate::ops::skip::SkipOp;
use crate::ops::sleep::SleepOp;
use crate::ops::terminal_cache::BufferedOp;
use crate::ops::try_map::TryMapOp;
use crate::ops::until::{DropUntilOp, TakeUntilOp};
use crate::protocol::{ErrorControl, Producer};
use crate::source::{EmptyProducer, GenerateProducer, ValuesProducer};

/// Per-chain error hook: inspects an element-level failure and decides
/// whether the chain resumes, cancels, or aborts.
pub type ErrorHook = Arc<dyn Fn(&anyhow::Error) -> ErrorControl + Send + Sync>;

/// Where element-level failures of a chain are routed.
pub(crate) enum ErrorChannel {
  /// No hook registered: record the failure through `tracing` and resume.
  Trace,
  Hook(ErrorHook),
}

impl Clone for ErrorChannel {
  fn clone(&self) -> Self {
    match self {
      ErrorChannel::Trace => ErrorChannel::Trace,
      ErrorChannel::Hook(hook) => ErrorChannel::Hook(hook.clone()),
    }
  }
}

/// A lazy chain of sequence operators over elements of type `T`.
///
/// `Brook` values are cheap to clone and safe to consume repeatedly: every
/// terminal operation subscribes afresh. The one deliberate exception is a
/// generator-backed chain, whose producing closure is shared, so a second
/// consumption continues where the first stopped.
pub struct Brook<T>
where
  T: Clone + Send + Sync + 'static,
{
  pub(crate) producer: Arc<dyn Producer<T>>,
  pub(crate) channel: ErrorChannel,
}

impl<T> Clone for Brook<T>
where
  T: Clone + Send + Sync + 'static,
{
  fn clone(&self) -> Self {
    Self {
      producer: self.producer.clone(),
      channel: self.channel.clone(),
    }
  }
}

impl<T> Brook<T>
where
  T: Clone + Send + Sync + 'static,
{
  fn wrap(producer: impl Producer<T> + 'static) -> Self {
    Self {
      producer: Arc::new(producer),
      channel: ErrorChannel::Trace,
    }
  }

  pub(crate) fn derive<R: Clone + Send + Sync + 'static>(&self, producer: impl Producer<R> + 'static) -> Brook<R> {
    Brook {
      producer: Arc::new(producer),
      channel: self.channel.clone(),
    }
  }

  // --- Construction ---

  /// The empty chain.
  pub fn none() -> Self {
    Self::wrap(EmptyProducer)
  }

  /// A chain over a finite ordered collection of values.
  pub fn of(values: impl IntoIterator<Item = T>) -> Self {
    let items: Vec<Option<T>> = values.into_iter().map(Some).collect();
    if items.is_empty() {
      return Self::none();
    }
    Self::wrap(ValuesProducer::new(items))
  }

  /// A chain over explicit positions: `None` entries are real absent
  /// positions, distinct from "no element".
  pub fn of_nullable(positions: impl IntoIterator<Item = Option<T>>) -> Self {
    let items: Vec<Option<T>> = positions.into_iter().collect();
    if items.is_empty() {
      return Self::none();
    }
    Self::wrap(ValuesProducer::new(items))
  }

  /// An unbounded chain over a `produce next` closure. The closure is shared
  /// across subscriptions of this chain and everything derived from it.
  pub fn generate(supply: impl FnMut() -> T + Send + 'static) -> Self {
    Self::wrap(GenerateProducer::new(supply))
  }

  // --- Transformation surface ---

  /// Forwards only the values satisfying `predicate`. Rejected values leave
  /// no position behind; absent positions are dropped.
  pub fn filter(&self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
    self.derive(FilterOp::values(self.producer.clone(), Arc::new(predicate)))
  }

  /// Null-accepting filter: the predicate sees every position, absent ones
  /// as `None`, and keeps whatever it approves.
  pub fn filter_nullable(&self, predicate: impl Fn(Option<&T>) -> bool + Send + Sync + 'static) -> Self {
    self.derive(FilterOp::nullable(self.producer.clone(), Arc::new(predicate)))
  }

  /// Removes absent positions, keeping every value.
  pub fn compact(&self) -> Self {
    self.derive(FilterOp::compact(self.producer.clone()))
  }

  /// Replaces each absent position with a freshly supplied value.
  pub fn fill_absent(&self, supply: impl Fn() -> T + Send + Sync + 'static) -> Self {
    self.derive(FillAbsentOp::new(self.producer.clone(), Arc::new(supply)))
  }

  /// Applies `mapper` to every value. Absent positions flow past untouched.
  pub fn map<R>(&self, mapper: impl Fn(T) -> R + Send + Sync + 'static) -> Brook<R>
  where
    R: Clone + Send + Sync + 'static,
  {
    self.derive(MapOp::new(self.producer.clone(), Arc::new(mapper)))
  }

  /// Position-wise mapping: the mapper sees every slot and controls whether
  /// the outcome is a value or an absent position.
  pub fn map_nullable<R>(&self, mapper: impl Fn(Option<T>) -> Option<R> + Send + Sync + 'static) -> Brook<R>
  where
    R: Clone + Send + Sync + 'static,
  {
    self.derive(MapNullableOp::new(self.producer.clone(), Arc::new(mapper)))
  }

  /// Maps every value to a nested cursor and forwards all of its elements
  /// before advancing to the next outer value.
  pub fn flat_map<R, I>(&self, mapper: impl Fn(T) -> I + Send + Sync + 'static) -> Brook<R>
  where
    R: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = R>,
    I::IntoIter: 'static,
  {
    let mapper: FlatMapper<T, R> = Arc::new(move |value| Box::new(mapper(value).into_iter()) as InnerCursor<R>);
    self.derive(FlatMapOp::new(self.producer.clone(), mapper))
  }

  /// Keeps at most `max` positions. Absent positions count toward the cap
  /// even though the default terminal view drops them:
  /// `of_nullable([Some(1), None, Some(2), Some(3)]).limit(3)` has a default
  /// size of 2. Use `compact().limit(n)` for a value-exact cap.
  ///
  /// This is the primary safe way to consume an unbounded generator.
  pub fn limit(&self, max: usize) -> Self {
    self.derive(LimitOp::new(self.producer.clone(), max))
  }

  /// Drops the first `count` positions, absent ones included.
  pub fn skip(&self, count: usize) -> Self {
    self.derive(SkipOp::new(self.producer.clone(), count))
  }

  /// Forwards positions until the first value satisfying `predicate`, which
  /// is itself not forwarded. Absent positions never satisfy the predicate.
  pub fn take_until(&self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
    self.derive(TakeUntilOp::new(self.producer.clone(), Arc::new(predicate)))
  }

  /// Forwards positions while `predicate` holds; equivalent to
  /// `take_until` of the negated predicate.
  pub fn take_while(&self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
    self.take_until(move |value| !predicate(value))
  }

  /// Discards positions until the first value satisfying `predicate`, then
  /// forwards from that value on. Unsatisfiable predicates over unbounded
  /// sources fail with the unbounded-sequence error instead of hanging.
  pub fn drop_until(&self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
    self.derive(DropUntilOp::new(self.producer.clone(), Arc::new(predicate)))
  }

  /// Discards positions while `predicate` holds; equivalent to
  /// `drop_until` of the negated predicate.
  pub fn drop_while(&self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
    self.drop_until(move |value| !predicate(value))
  }

  /// Keeps the first occurrence of every distinct value (structural
  /// equality), preserving order. Fully drains the upstream.
  pub fn distinct(&self) -> Self
  where
    T: PartialEq,
  {
    self.distinct_by(|left, right| left == right)
  }

  /// `distinct` under a caller-supplied pairwise comparator. The check is a
  /// linear scan of the values seen so far: equality carries no hash here.
  pub fn distinct_by(&self, same: impl Fn(&T, &T) -> bool + Send + Sync + 'static) -> Self {
    self.buffered(move |positions| {
      let mut kept: Vec<Option<T>> = Vec::new();
      for slot in positions {
        let duplicate = kept.iter().any(|seen| match (seen, &slot) {
          (Some(a), Some(b)) => same(a, b),
          (None, None) => true,
          _ => false,
        });
        if !duplicate {
          kept.push(slot);
        }
      }
      kept
    })
  }

  /// Sorts by the natural order. Fully drains the upstream.
  pub fn sorted(&self) -> Self
  where
    T: Ord,
  {
    self.sorted_by(|left, right| left.cmp(right))
  }

  /// Sorts with a caller-supplied comparator; stable. Absent positions are
  /// ordered after all values, preserving their relative order.
  pub fn sorted_by(&self, compare: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
    self.buffered(move |positions| {
      let mut absent = 0usize;
      let mut values: Vec<T> = Vec::with_capacity(positions.len());
      for slot in positions {
        match slot {
          Some(value) => values.push(value),
          None => absent += 1,
        }
      }
      values.sort_by(|a, b| compare(a, b));
      let mut out: Vec<Option<T>> = values.into_iter().map(Some).collect();
      out.extend(std::iter::repeat_with(|| None).take(absent));
      out
    })
  }

  /// Drains the upstream into an ordered buffer, applies `transform` to the
  /// buffered positions, and replays the result as a fresh bounded source.
  /// Fails on unbounded upstreams.
  pub fn buffered(&self, transform: impl Fn(Vec<Option<T>>) -> Vec<Option<T>> + Send + Sync + 'static) -> Self {
    self.derive(BufferedOp::new(self.producer.clone(), Arc::new(transform)))
  }

  /// Applies a fallible mapper. A failing element becomes an absent
  /// position and its error is routed to the chain's error channel.
  pub fn try_map<R>(&self, mapper: impl Fn(T) -> anyhow::Result<R> + Send + Sync + 'static) -> Brook<R>
  where
    R: Clone + Send + Sync + 'static,
  {
    self.derive(TryMapOp::new(self.producer.clone(), Arc::new(mapper)))
  }

  /// Observes every value on its way through.
  pub fn inspect(&self, observer: impl Fn(&T) + Send + Sync + 'static) -> Self {
    self.derive(InspectOp::new(self.producer.clone(), Arc::new(observer)))
  }

  /// Hard assertion: a value failing `predicate`, or any absent position,
  /// aborts the evaluation with `BrookError::Assertion`.
  pub fn assert_each(&self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static, message: &str) -> Self {
    self.derive(AssertEachOp::new(
      self.producer.clone(),
      Arc::new(predicate),
      Arc::from(message),
    ))
  }

  /// Blocks the calling thread for `duration` before every position.
  pub fn sleep(&self, duration: Duration) -> Self {
    self.sleep_every(1, duration)
  }

  /// Blocks the calling thread for `duration` before every n-th position.
  pub fn sleep_every(&self, every: usize, duration: Duration) -> Self {
    self.derive(SleepOp::new(self.producer.clone(), every, duration))
  }

  /// Registers the chain's error hook, replacing any previous one. The hook
  /// observes every element-level failure and rules on the chain's fate.
  pub fn on_error(&self, hook: impl Fn(&anyhow::Error) -> ErrorControl + Send + Sync + 'static) -> Self {
    Self {
      producer: self.producer.clone(),
      channel: ErrorChannel::Hook(Arc::new(hook)),
    }
  }

  /// Converts the first element-level failure into a hard, chain-aborting
  /// `BrookError::Element`.
  pub fn assert_no_error(&self) -> Self {
    self.on_error(|_| ErrorControl::Abort)
  }

  /// Falls back to `alternative` if this chain evaluates to zero values
  /// (absent-only positions count as zero).
  pub fn or(&self, alternative: Brook<T>) -> Self {
    self.derive(OrOp::new(self.producer.clone(), alternative.producer))
  }
}

impl Brook<u64> {
  /// The unbounded generator of auto-incrementing integers starting at 0.
  pub fn naturals() -> Self {
    let mut next = 0u64;
    Self::generate(move || {
      let value = next;
      next += 1;
      value
    })
  }
}

impl Brook<AnyValue> {
  /// Cast-and-filter-by-type: forwards values downcastable to `R`, removes
  /// the rest, and keeps absent positions.
  pub fn cast<R>(&self) -> Brook<R>
  where
    R: Clone + Send + Sync + 'static,
  {
    self.derive(CastOp::<R>::new(self.producer.clone()))
  }
}

impl<T> FromIterator<T> for Brook<T>
where
  T: Clone + Send + Sync + 'static,
{
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    Self::of(iter)
  }
}

impl<T> From<Vec<T>> for Brook<T>
where
  T: Clone + Send + Sync + 'static,
{
  fn from(values: Vec<T>) -> Self {
    Self::of(values)
  }
}
