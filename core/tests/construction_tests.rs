// tests/construction_tests.rs
mod common; // Reference the common module

use common::*;

use brook::Brook;

#[test]
fn test_of_builds_a_finite_chain() {
  setup_tracing();

  assert_eq!(Brook::of([1, 2, 3]).collect().unwrap(), vec![1, 2, 3]);
  assert_eq!(Brook::of(["1"]).size().unwrap(), 1);
  assert_eq!(Brook::of(vec![1, 2, 3]).size().unwrap(), 3);
  assert_eq!(Brook::<i32>::of([]).size().unwrap(), 0);
}

#[test]
fn test_none_is_empty() {
  setup_tracing();

  let none = Brook::<i32>::none();
  assert!(none.collect().unwrap().is_empty());
  assert_eq!(none.size().unwrap(), 0);
  assert!(!none.present().unwrap());
}

#[test]
fn test_nullable_positions_are_distinct_from_values() {
  setup_tracing();

  let chain = Brook::of_nullable([Some(1), None, Some(2)]);
  // Default consumption drops absent positions, the nullable view keeps them.
  assert_eq!(chain.collect().unwrap(), vec![1, 2]);
  assert_eq!(chain.size().unwrap(), 2);
  assert_eq!(chain.collect_nullable().unwrap(), vec![Some(1), None, Some(2)]);
  assert_eq!(chain.collect_nullable().unwrap().len(), 3);
}

#[test]
fn test_chains_are_reusable_descriptions() {
  setup_tracing();

  let chain = Brook::of([1, 2, 3]).map(|i| i * 10);
  assert_eq!(chain.collect().unwrap(), vec![10, 20, 30]);
  // A second terminal call re-evaluates from the source.
  assert_eq!(chain.collect().unwrap(), vec![10, 20, 30]);
}

#[test]
fn test_generator_state_survives_across_subscriptions() {
  setup_tracing();

  let range = Brook::naturals();
  assert_eq!(range.limit(2).collect().unwrap(), vec![0, 1]);
  // The producing closure is shared: consumption resumes where it stopped.
  assert_eq!(range.limit(2).collect().unwrap(), vec![2, 3]);
  assert_eq!(range.limit(2).collect().unwrap(), vec![4, 5]);
}

#[test]
fn test_generate_wraps_a_custom_closure() {
  setup_tracing();

  let mut current = 1u32;
  let doubling = Brook::generate(move || {
    let value = current;
    current *= 2;
    value
  });
  assert_eq!(doubling.limit(4).collect().unwrap(), vec![1, 2, 4, 8]);
}

#[test]
fn test_from_iterator_and_from_vec() {
  setup_tracing();

  let collected: Brook<i32> = (1..=3).collect();
  assert_eq!(collected.collect().unwrap(), vec![1, 2, 3]);

  let converted = Brook::from(vec![4, 5]);
  assert_eq!(converted.collect().unwrap(), vec![4, 5]);
}
