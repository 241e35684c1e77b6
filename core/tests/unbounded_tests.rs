// tests/unbounded_tests.rs
mod common;

use common::*;

use brook::{Brook, BrookError, DROP_BUDGET};

#[test]
fn test_limit_is_the_safe_way_to_consume_a_generator() {
  setup_tracing();

  assert_eq!(Brook::naturals().limit(5).collect().unwrap(), vec![0, 1, 2, 3, 4]);
  for n in [0usize, 1, 2, 17] {
    assert!(Brook::naturals().limit(n).collect().unwrap().len() <= n);
  }
  assert_eq!(Brook::naturals().limit(1).last().unwrap().get(), Some(0));
}

#[test]
fn test_draining_a_generator_is_a_hard_failure() {
  setup_tracing();

  assert!(matches!(Brook::naturals().collect(), Err(BrookError::Unbounded { .. })));
  assert!(matches!(Brook::naturals().size(), Err(BrookError::Unbounded { .. })));
  assert!(matches!(Brook::naturals().last(), Err(BrookError::Unbounded { .. })));
}

#[test]
fn test_full_drain_operators_reject_generators() {
  setup_tracing();

  // sorted before limit still needs the whole stream: hard failure, no hang.
  assert!(matches!(
    Brook::naturals().sorted().limit(4).collect(),
    Err(BrookError::Unbounded { .. })
  ));
  assert!(matches!(Brook::naturals().distinct().first(), Err(BrookError::Unbounded { .. })));

  // Bounding first makes both fine.
  assert_eq!(Brook::naturals().limit(4).sorted().collect().unwrap(), vec![0, 1, 2, 3]);
  assert_eq!(Brook::naturals().limit(4).distinct().size().unwrap(), 4);
}

#[test]
fn test_unsatisfiable_drop_until_fails_fast() {
  setup_tracing();

  let never = Brook::naturals().drop_until(|_| false);
  assert!(matches!(never.first(), Err(BrookError::Unbounded { .. })));
}

#[test]
fn test_satisfiable_drop_until_works_within_budget() {
  setup_tracing();

  assert_eq!(Brook::naturals().drop_until(|i| *i > 200).first().unwrap().get(), Some(201));
}

#[test]
fn test_skip_is_bounded_by_the_drop_budget() {
  setup_tracing();

  assert_eq!(Brook::naturals().nth(10).unwrap().get(), Some(10));
  assert!(matches!(
    Brook::naturals().skip(DROP_BUDGET + 1).first(),
    Err(BrookError::Unbounded { .. })
  ));
}

#[test]
fn test_pull_terminals_walk_infinite_chains() {
  setup_tracing();

  let evens = Brook::naturals().filter(|i| i % 2 == 0);
  let mut iter = evens.iter();
  assert_eq!(iter.next().unwrap().unwrap(), 0);
  assert_eq!(iter.next().unwrap().unwrap(), 2);
  assert_eq!(iter.next().unwrap().unwrap(), 4);

  assert_eq!(Brook::naturals().first().unwrap().get(), Some(0));
  assert_eq!(Brook::naturals().nth(2).unwrap().get(), Some(2));
}

#[test]
fn test_take_until_bounds_pull_consumption() {
  setup_tracing();

  let mut seen = Vec::new();
  Brook::naturals()
    .take_until(|i| *i >= 3)
    .for_each(|v| seen.push(v))
    .unwrap();
  assert_eq!(seen, vec![0, 1, 2]);
}
