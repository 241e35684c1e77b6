// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use brook::{BrookResult, ChainControl, Consumer};
use tracing::Level;

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Protocol-level consumer that records every signal it receives ---

pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn event_log() -> EventLog {
  Rc::new(RefCell::new(Vec::new()))
}

pub struct RecordingConsumer {
  log: EventLog,
  stop_after: Option<usize>,
  values_seen: usize,
}

impl RecordingConsumer {
  pub fn new(log: EventLog) -> Self {
    Self {
      log,
      stop_after: None,
      values_seen: 0,
    }
  }

  /// Returns `ChainControl::Stop` once `limit` values have been delivered.
  pub fn stopping_after(log: EventLog, limit: usize) -> Self {
    Self {
      log,
      stop_after: Some(limit),
      values_seen: 0,
    }
  }
}

impl<T: Debug> Consumer<T> for RecordingConsumer {
  fn next(&mut self, value: T) -> BrookResult<ChainControl> {
    self.log.borrow_mut().push(format!("next:{value:?}"));
    self.values_seen += 1;
    if let Some(limit) = self.stop_after {
      if self.values_seen >= limit {
        return Ok(ChainControl::Stop);
      }
    }
    Ok(ChainControl::Continue)
  }

  fn next_absent(&mut self) -> BrookResult<ChainControl> {
    self.log.borrow_mut().push("absent".to_string());
    Ok(ChainControl::Continue)
  }

  fn on_complete(&mut self) {
    self.log.borrow_mut().push("complete".to_string());
  }

  fn on_cancelled(&mut self) {
    self.log.borrow_mut().push("cancelled".to_string());
  }

  fn on_error(&mut self, error: anyhow::Error) -> BrookResult<ChainControl> {
    self.log.borrow_mut().push(format!("error:{error}"));
    Ok(ChainControl::Continue)
  }
}
