// pipekit/src/core/step.rs

//! Defines the `Step<In>` trait: the unit every pipeline is built from.

use super::flow::Flow;
use crate::error::PipeResult;
use crate::pipeline::definition::Pipeline;

/// A unary transformation from `In` to `Self::Output`, synchronous or not.
///
/// `Err` in the returned flow means the step *raised*; ordinary failures
/// (parse errors, validation errors) belong in `Output` as values.
/// [`Pipeline`](crate::Pipeline) implements `Step`, so pipelines nest
/// anywhere a step is expected.
pub trait Step<In>: Send + Sync + 'static {
  type Output: Send + 'static;

  fn call(&self, input: In) -> Flow<PipeResult<Self::Output>>;

  /// Number of steps this one counts for in a pipeline's `depth()`.
  fn depth(&self) -> usize {
    1
  }

  /// Turns the step into a pipeline. A pipeline is returned as is.
  fn into_pipeline(self) -> Pipeline<In, Self::Output>
  where
    Self: Sized,
    In: Send + 'static,
  {
    Pipeline::from_step(self)
  }
}
