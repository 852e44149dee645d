// pipekit/src/pipeline/execution.rs

//! Invoking a `Pipeline<In, Out>`.

use crate::core::flow::Flow;
use crate::core::step::Step;
use crate::error::PipeResult;
use crate::pipeline::definition::Pipeline;
use tracing::{event, Level};

impl<In, Out> Pipeline<In, Out>
where
  In: Send + 'static,
  Out: Send + 'static,
{
  /// Threads `input` through every step in append order.
  ///
  /// Returns `Flow::Ready` when every step on the path was synchronous.
  /// `Err` means a throw boundary (or a raising step) fired; steps after it
  /// did not run.
  pub fn call(&self, input: In) -> Flow<PipeResult<Out>> {
    event!(
      Level::TRACE,
      input_type = %std::any::type_name::<In>(),
      output_type = %std::any::type_name::<Out>(),
      depth = self.depth,
      "Pipeline invoked."
    );
    (self.runner)(input)
  }
}

impl<In, Out> Step<In> for Pipeline<In, Out>
where
  In: Send + 'static,
  Out: Send + 'static,
{
  type Output = Out;

  fn call(&self, input: In) -> Flow<PipeResult<Out>> {
    Pipeline::call(self, input)
  }

  fn depth(&self) -> usize {
    self.depth
  }

  fn into_pipeline(self) -> Pipeline<In, Out>
  where
    Self: Sized,
    In: Send + 'static,
  {
    self
  }
}
