// tests/error_handling_tests.rs
mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::*;

use anyhow::anyhow;
use brook::{Brook, BrookError, ErrorControl};

/// Divides `x` by `x % 2`, failing on even input the way the integer
/// division would.
fn halting_division(x: i32) -> anyhow::Result<i32> {
  let divisor = x % 2;
  if divisor == 0 {
    return Err(anyhow!("division by zero on {x}"));
  }
  Ok(x / divisor)
}

#[test]
fn test_failed_elements_become_absent_positions() {
  setup_tracing();

  // No hook registered: the failure is traced and the chain continues with
  // an absent placeholder for the failing position.
  let chain = Brook::of([1, 2, 3]).try_map(halting_division);
  assert_eq!(chain.size().unwrap(), 2);
  assert_eq!(chain.collect().unwrap(), vec![1, 3]);
  assert_eq!(chain.collect_nullable().unwrap(), vec![Some(1), None, Some(3)]);
}

#[test]
fn test_resume_hook_observes_every_failure() {
  setup_tracing();

  let failures = Arc::new(AtomicUsize::new(0));
  let seen = failures.clone();
  let chain = Brook::of([1, 2, 3, 4])
    .on_error(move |error| {
      assert!(error.to_string().contains("division by zero"));
      seen.fetch_add(1, Ordering::SeqCst);
      ErrorControl::Resume
    })
    .try_map(halting_division);

  assert_eq!(chain.collect().unwrap(), vec![1, 3]);
  assert_eq!(failures.load(Ordering::SeqCst), 2);
}

#[test]
fn test_cancel_hook_keeps_only_elements_before_the_failure() {
  setup_tracing();

  let chain = Brook::of([1, 2, 3])
    .on_error(|_| ErrorControl::Cancel)
    .try_map(halting_division);

  // Nothing for the failing position, nothing after it.
  assert_eq!(chain.collect().unwrap(), vec![1]);
}

#[test]
fn test_cancelled_failure_position_is_still_substitutable() {
  setup_tracing();

  // The absent placeholder for the failing element is emitted before the
  // hook rules, so a downstream fill_absent still sees it.
  let chain = Brook::of([1, 2, 3])
    .on_error(|_| ErrorControl::Cancel)
    .try_map(halting_division)
    .fill_absent(|| 10);
  assert_eq!(chain.collect().unwrap(), vec![1, 10]);
}

#[test]
fn test_hook_registration_order_does_not_matter() {
  setup_tracing();

  // The channel is chain-wide, not positional: registering after try_map
  // routes the same failures.
  let chain = Brook::of([1, 2, 3])
    .try_map(halting_division)
    .on_error(|_| ErrorControl::Cancel);
  assert_eq!(chain.collect().unwrap(), vec![1]);
}

#[test]
fn test_abort_hook_turns_failures_hard() {
  setup_tracing();

  let chain = Brook::of([1, 2, 3]).assert_no_error().try_map(halting_division);
  let result = chain.collect();
  match result {
    Err(BrookError::Element { source }) => {
      assert!(source.to_string().contains("division by zero on 2"));
    }
    other => panic!("expected an element failure, got {other:?}"),
  }
}

#[test]
fn test_try_for_each_routes_through_the_channel() {
  setup_tracing();

  let failures = Arc::new(AtomicUsize::new(0));
  let seen = failures.clone();
  let outcome = Brook::of([1, 2, 3])
    .on_error(move |_| {
      seen.fetch_add(1, Ordering::SeqCst);
      ErrorControl::Resume
    })
    .try_for_each(|value| {
      if value == 2 {
        return Err(anyhow!("rejected {value}"));
      }
      Ok(())
    });

  assert!(outcome.is_ok());
  assert_eq!(failures.load(Ordering::SeqCst), 1);
}

#[test]
fn test_assert_each_aborts_on_violation() {
  setup_tracing();

  let passing = Brook::of([1, 2]).assert_each(|i| *i < 3, "value out of range");
  assert_eq!(passing.collect().unwrap(), vec![1, 2]);

  let failing = Brook::of([1, 2, 3]).assert_each(|i| *i < 3, "value out of range");
  assert!(matches!(failing.collect(), Err(BrookError::Assertion { .. })));

  // Absent positions fail the assertion outright.
  let absent = Brook::of_nullable([Some(1), None]).assert_each(|_| true, "no holes");
  assert!(matches!(absent.collect(), Err(BrookError::Assertion { .. })));
}

#[test]
fn test_later_hook_replaces_the_earlier_one() {
  setup_tracing();

  let first_calls = Arc::new(AtomicUsize::new(0));
  let first_seen = first_calls.clone();
  let chain = Brook::of([1, 2, 3])
    .on_error(move |_| {
      first_seen.fetch_add(1, Ordering::SeqCst);
      ErrorControl::Resume
    })
    .on_error(|_| ErrorControl::Cancel)
    .try_map(halting_division);

  assert_eq!(chain.collect().unwrap(), vec![1]);
  assert_eq!(first_calls.load(Ordering::SeqCst), 0);
}
