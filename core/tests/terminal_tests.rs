// tests/terminal_tests.rs
mod common;

use std::collections::HashMap;

use common::*;

use brook::{Brook, BrookError, Maybe};

#[test]
fn test_collect_drops_absent_positions() {
  setup_tracing();

  assert_eq!(Brook::of(["1", "2"]).collect().unwrap(), vec!["1", "2"]);
  assert_eq!(Brook::of_nullable([Some("1"), None, Some("2")]).collect().unwrap(), vec!["1", "2"]);
}

#[test]
fn test_first_skips_absent_positions() {
  setup_tracing();

  assert_eq!(Brook::of([1, 2, 3]).first().unwrap().get(), Some(1));
  assert_eq!(Brook::of_nullable([None, Some(1)]).first().unwrap().get(), Some(1));
  assert!(Brook::<i32>::none().first().unwrap().is_absent());
  assert!(Brook::of_nullable([None::<i32>]).first().unwrap().is_absent());
}

#[test]
fn test_last_returns_the_final_value() {
  setup_tracing();

  assert_eq!(Brook::of([1, 2, 3]).last().unwrap().get(), Some(3));
  assert_eq!(Brook::of_nullable([Some(1), None]).last().unwrap().get(), Some(1));
  assert!(Brook::<i32>::none().last().unwrap().is_absent());
}

#[test]
fn test_nth_indexes_positions() {
  setup_tracing();

  let chain = Brook::of([1, 2, 3]);
  assert_eq!(chain.nth(0).unwrap().get(), Some(1));
  assert_eq!(chain.nth(1).unwrap().get(), Some(2));
  assert_eq!(chain.nth(2).unwrap().get(), Some(3));
  assert!(chain.nth(4).unwrap().is_absent());
}

#[test]
fn test_required_raises_the_out_of_elements_failure() {
  setup_tracing();

  assert_eq!(Brook::of([1]).first().unwrap().required().unwrap(), 1);
  let missing = Brook::<i32>::none().first().unwrap().required();
  assert!(matches!(missing, Err(BrookError::NoSuchElement)));
}

#[test]
fn test_contains_short_circuits() {
  setup_tracing();

  assert!(!Brook::<i32>::none().contains(&1).unwrap());
  assert!(!Brook::of([1, 2]).contains(&3).unwrap());
  assert!(Brook::of([1, 2]).contains(&1).unwrap());
  assert!(Brook::of([1, 2]).contains(&2).unwrap());
  // Safe on unbounded chains when the probe exists.
  assert!(Brook::naturals().contains(&5).unwrap());
}

#[test]
fn test_reduce_skips_absent_and_short_circuits_on_none() {
  setup_tracing();

  assert_eq!(Brook::of([1, 2, 3]).reduce(|a, b| Some(a + b)).unwrap().get(), Some(6));
  assert_eq!(
    Brook::of_nullable([None, Some(1), Some(2), Some(3)])
      .reduce(|a, b| Some(a + b))
      .unwrap()
      .get(),
    Some(6)
  );
  assert!(Brook::<i32>::none().reduce(|a, b| Some(a + b)).unwrap().is_absent());

  let short_circuited = Brook::of([1, 2, 3]).reduce(|a, b| if b == 3 { None } else { Some(a + b) });
  assert!(short_circuited.unwrap().is_absent());
}

#[test]
fn test_fold_accumulates_from_the_seed() {
  setup_tracing();

  assert_eq!(Brook::of([1, 2, 3]).fold(0, |a, b| Some(a + b)).unwrap().get(), Some(6));
  assert_eq!(Brook::of([1, 2, 3]).fold(1, |a, b| Some(a + b)).unwrap().get(), Some(7));
  assert_eq!(Brook::<i32>::none().fold(9, |a, b| Some(a + b)).unwrap().get(), Some(9));

  // An accumulator yielding None collapses the whole reduction to absent.
  let collapsed = Brook::of([1, 2, 3]).fold(0, |a, b| if b == 3 { None } else { Some(a + b) });
  assert!(collapsed.unwrap().is_absent());
}

#[test]
fn test_to_map_groups_values() {
  setup_tracing();

  let map = Brook::of([(1, "one"), (2, "two")])
    .to_map(|entry| entry.0, |entry| entry.1)
    .unwrap();
  let expected: HashMap<i32, &str> = HashMap::from([(1, "one"), (2, "two")]);
  assert_eq!(map, expected);

  // Later keys overwrite earlier ones.
  let last_wins = Brook::of([(1, "a"), (1, "b")]).to_map(|e| e.0, |e| e.1).unwrap();
  assert_eq!(last_wins.get(&1), Some(&"b"));
}

#[test]
fn test_or_switches_only_when_no_value_exists() {
  setup_tracing();

  let fallback = Brook::<&str>::none().or(Brook::of(["1"]));
  assert_eq!(fallback.collect().unwrap(), vec!["1"]);

  let kept = Brook::of(["1", "2"]).or(Brook::of(["5", "4"]));
  assert_eq!(kept.collect().unwrap(), vec!["1", "2"]);

  assert_eq!(Brook::of([1, 2]).filter(|i| *i > 3).size().unwrap(), 0);
  assert_eq!(
    Brook::of([1, 2]).filter(|i| *i > 3).or(Brook::of([1, 2, 3, 4])).size().unwrap(),
    4
  );

  // Absent-only chains count as empty.
  let absent_only = Brook::of_nullable([None::<i32>]).or(Brook::of([5]));
  assert_eq!(absent_only.collect().unwrap(), vec![5]);
}

#[test]
fn test_iterators_pull_one_position_at_a_time() {
  setup_tracing();

  let mut iter = Brook::of([1, 2]).iter();
  assert_eq!(iter.next().unwrap().unwrap(), 1);
  assert_eq!(iter.next().unwrap().unwrap(), 2);
  assert!(iter.next().is_none());
  assert!(iter.next().is_none());

  // The default iterator skips absent positions, the nullable one keeps them.
  let mut defaulted = Brook::of_nullable([None, Some(2)]).iter();
  assert_eq!(defaulted.next().unwrap().unwrap(), 2);
  assert!(defaulted.next().is_none());

  let mut nullable = Brook::of_nullable([None, Some(2)]).iter_nullable();
  assert_eq!(nullable.next().unwrap().unwrap(), None);
  assert_eq!(nullable.next().unwrap().unwrap(), Some(2));
  assert!(nullable.next().is_none());
}

#[test]
fn test_for_each_variants() {
  setup_tracing();

  let mut values = Vec::new();
  Brook::of_nullable([Some(1), None, Some(3)])
    .for_each(|v| values.push(v))
    .unwrap();
  assert_eq!(values, vec![1, 3]);

  let mut positions = Vec::new();
  Brook::of_nullable([Some(1), None, Some(3)])
    .for_each_nullable(|slot| positions.push(slot))
    .unwrap();
  assert_eq!(positions, vec![Some(1), None, Some(3)]);
}

#[test]
fn test_maybe_combinators() {
  setup_tracing();

  let present = Maybe::present(2);
  assert_eq!(present.map(|v| v * 10).get(), Some(20));
  assert_eq!(present.filter(|v| *v > 5).get(), None);
  assert_eq!(Maybe::<i32>::absent().unwrap_or(7), 7);
  assert_eq!(Maybe::present(3).unwrap_or_else(|| 7), 3);
  assert_eq!(Maybe::from(Some(1)), Maybe::present(1));
}
