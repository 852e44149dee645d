// pipekit/src/pipes/throw.rs

//! The throw boundary: the one step that turns an error value into a raised error.

use crate::core::flow::Flow;
use crate::error::PipeError;
use crate::pipeline::Pipeline;
use tracing::{event, Level};

/// Passes `Ok(value)` through as `value`; raises `Err(e)` as
/// [`PipeError::Raised`], skipping every later step.
///
/// The caller gets the error back from `call(..).await` and can recover it
/// with `PipeError::downcast_ref::<E>()`.
pub fn throw_pipe<T, E>() -> Pipeline<Result<T, E>, T>
where
  T: Send + 'static,
  E: std::error::Error + Send + Sync + 'static,
{
  Pipeline::from_runner(1, |input: Result<T, E>| {
    Flow::Ready(input.map_err(|err| {
      event!(
        Level::DEBUG,
        error_type = %std::any::type_name::<E>(),
        error = %err,
        "Throw boundary raising error value."
      );
      PipeError::raised(err)
    }))
  })
}
