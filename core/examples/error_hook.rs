// brook_core/examples/error_hook.rs

use anyhow::anyhow;
use brook::{Brook, BrookError, ErrorControl};
use tracing::{info, warn};

fn parse_header(line: &str) -> anyhow::Result<u32> {
  line
    .split(':')
    .next_back()
    .and_then(|field| field.trim().parse().ok())
    .ok_or_else(|| anyhow!("malformed header line: {line:?}"))
}

fn main() -> Result<(), BrookError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Error Hook Example ---");

  let lines = Brook::of(["size: 10", "size: 20", "oops", "size: 40"]);

  // Without a hook, a failing element is traced, becomes an absent
  // position, and the chain keeps going.
  let lenient = lines.try_map(parse_header);
  info!("lenient parse: {:?}", lenient.collect()?);

  // A hook observes each failure and can cancel the chain cleanly.
  let until_first_failure = lines
    .on_error(|error| {
      warn!("stopping at first bad line: {error}");
      ErrorControl::Cancel
    })
    .try_map(parse_header);
  info!("prefix before failure: {:?}", until_first_failure.collect()?);

  // Or substitute a default for every failed position instead.
  let defaulted = lines.try_map(parse_header).fill_absent(|| 0);
  info!("defaulted parse: {:?}", defaulted.collect()?);

  // assert_no_error turns the first failure into a hard error.
  let strict = lines.assert_no_error().try_map(parse_header);
  match strict.collect() {
    Ok(values) => info!("strict parse: {values:?}"),
    Err(error) => warn!("strict parse failed: {error}"),
  }

  Ok(())
}
