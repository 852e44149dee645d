// pipekit/src/error.rs

//! Errors that leave a pipeline as control flow.
//!
//! Parsing and validation failures are *values* (see `pipes::parse` and
//! `validation`); the only way a failure becomes an `Err` of
//! [`Pipeline::call`](crate::Pipeline::call) is an explicit throw boundary or
//! a failing downstream handler.

use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipeError {
  /// An error value reached a throw boundary and was converted into a raised error.
  #[error("Value of type {type_name} raised at throw boundary. Source: {source}")]
  Raised {
    type_name: &'static str,
    #[source]
    source: AnyhowError,
  },

  /// A handler further down a middleware chain failed.
  #[error("Error in downstream handler. Source: {source}")]
  Handler {
    #[source]
    source: AnyhowError,
  },
}

impl PipeError {
  pub fn raised<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    PipeError::Raised {
      type_name: std::any::type_name::<E>(),
      source: AnyhowError::new(err),
    }
  }

  /// Recovers the typed error carried by this `PipeError`, if it is an `E`.
  pub fn downcast_ref<E>(&self) -> Option<&E>
  where
    E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
  {
    match self {
      PipeError::Raised { source, .. } | PipeError::Handler { source } => source.downcast_ref::<E>(),
    }
  }

  pub fn is_raised(&self) -> bool {
    matches!(self, PipeError::Raised { .. })
  }
}

impl From<AnyhowError> for PipeError {
  fn from(err: AnyhowError) -> Self {
    // A PipeError smuggled through anyhow keeps its original shape.
    match err.downcast::<PipeError>() {
      Ok(pipe_err) => pipe_err,
      Err(source) => PipeError::Handler { source },
    }
  }
}

pub type PipeResult<T, E = PipeError> = std::result::Result<T, E>;
