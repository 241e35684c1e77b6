// brook/src/seq/iter.rs

//! Pull iterators over a chain. Each `next` call demands exactly one more
//! unit of work; hard failures surface as `Err` items and end the iteration.

use super::execution::Drive;
use crate::error::BrookResult;

/// Iterator over the values of a chain, skipping absent positions.
pub struct Elements<T> {
  drive: Drive<T>,
  done: bool,
}

impl<T> Elements<T> {
  pub(crate) fn new(drive: Drive<T>) -> Self {
    Self { drive, done: false }
  }
}

impl<T> Iterator for Elements<T> {
  type Item = BrookResult<T>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }
    loop {
      match self.drive.next_position() {
        Err(error) => {
          self.done = true;
          return Some(Err(error));
        }
        Ok(None) => {
          self.done = true;
          return None;
        }
        Ok(Some(Some(value))) => return Some(Ok(value)),
        Ok(Some(None)) => continue,
      }
    }
  }
}

impl<T> Drop for Elements<T> {
  fn drop(&mut self) {
    if !self.done {
      self.drive.cancel();
    }
  }
}

/// Iterator over every position of a chain, absent ones as `None`.
pub struct Positions<T> {
  drive: Drive<T>,
  done: bool,
}

impl<T> Positions<T> {
  pub(crate) fn new(drive: Drive<T>) -> Self {
    Self { drive, done: false }
  }
}

impl<T> Iterator for Positions<T> {
  type Item = BrookResult<Option<T>>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }
    match self.drive.next_position() {
      Err(error) => {
        self.done = true;
        Some(Err(error))
      }
      Ok(None) => {
        self.done = true;
        None
      }
      Ok(Some(slot)) => Some(Ok(slot)),
    }
  }
}

impl<T> Drop for Positions<T> {
  fn drop(&mut self) {
    if !self.done {
      self.drive.cancel();
    }
  }
}
