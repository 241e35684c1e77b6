// brook_core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrookError {
    #[error("unbounded sequence: {detail}")]
    Unbounded { detail: String },

    #[error("no element present")]
    NoSuchElement,

    #[error("element processing failed. Source: {source}")]
    Element {
        #[source]
        source: AnyhowError,
    },

    #[error("element assertion failed: {message}")]
    Assertion { message: String },
}

// This is the key conversion brook provides for external errors: anything a
// user mapper or hook reports is carried as an element-level failure.
impl From<AnyhowError> for BrookError {
  fn from(err: AnyhowError) -> Self {
    BrookError::Element { source: err }
  }
}

pub type BrookResult<T, E = BrookError> = std::result::Result<T, E>;
