// brook_core/examples/basic_chain.rs

use brook::{Brook, BrookError};
use tracing::info;

fn main() -> Result<(), BrookError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Chain Example ---");

  // 1. Describe a chain. Nothing runs yet: a Brook is only a description.
  let chain = Brook::of([4, 1, 7, 1, 9, 2])
    .filter(|n| *n > 1)
    .map(|n| n * 10)
    .distinct()
    .sorted();

  // 2. Consume it through terminal operations. Every terminal call
  //    re-evaluates the chain from its source.
  info!("sorted distinct values: {:?}", chain.collect()?);
  info!("first: {:?}", chain.first()?.get());
  info!("size: {}", chain.size()?);

  // 3. Unbounded sources work with the same operators, as long as something
  //    bounds them before a full drain.
  let squares = Brook::naturals().map(|n| n * n).limit(6);
  info!("first six squares: {:?}", squares.collect()?);

  // 4. Null-valued positions are real elements until the terminal view
  //    drops them.
  let gappy = Brook::of_nullable([Some("a"), None, Some("b")]);
  info!("default view: {:?}", gappy.collect()?);
  info!("nullable view: {:?}", gappy.collect_nullable()?);

  Ok(())
}
