// pipekit/src/pipeline/definition.rs

//! Contains the `Pipeline<In, Out>` struct and its constructors.

use crate::core::flow::Flow;
use crate::core::step::Step;
use crate::error::PipeResult;
use futures::future::FutureExt;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

pub(crate) type Runner<In, Out> = Arc<dyn Fn(In) -> Flow<PipeResult<Out>> + Send + Sync>;

/// An immutable, ordered composition of steps, callable as one step.
///
/// Appending (`pipe`, `pipe_async`, `then`, `flat_pipe`) never touches the
/// receiver: the new pipeline holds an `Arc` to the previous chain plus the
/// new step, so a base pipeline can be extended in several directions and
/// shared across tasks.
pub struct Pipeline<In, Out> {
  pub(crate) runner: Runner<In, Out>,
  pub(crate) depth: usize,
  pub(crate) _marker: PhantomData<fn(In) -> Out>,
}

impl<In, Out> Pipeline<In, Out>
where
  In: Send + 'static,
  Out: Send + 'static,
{
  pub(crate) fn from_runner(
    depth: usize,
    runner: impl Fn(In) -> Flow<PipeResult<Out>> + Send + Sync + 'static,
  ) -> Self {
    Self {
      runner: Arc::new(runner),
      depth,
      _marker: PhantomData,
    }
  }

  /// Creates a pipeline from a synchronous function.
  pub fn new(f: impl Fn(In) -> Out + Send + Sync + 'static) -> Self {
    Self::from_runner(1, move |input| Flow::Ready(Ok(f(input))))
  }

  /// Creates a pipeline that ignores its input and returns a copy of `value`.
  pub fn value(value: Out) -> Self
  where
    Out: Clone + Sync,
  {
    Self::from_runner(1, move |_| Flow::Ready(Ok(value.clone())))
  }

  /// Creates a pipeline from an asynchronous function.
  pub fn from_async<F, Fut>(f: F) -> Self
  where
    F: Fn(In) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Out> + Send + 'static,
  {
    Self::from_runner(1, move |input| Flow::pending(f(input).map(Ok)))
  }

  /// Creates a pipeline whose output is the result of `fut`.
  ///
  /// The future is shared: it is polled at most once, on the first await of
  /// any call, and every call observes a clone of its output.
  pub fn deferred(fut: impl Future<Output = Out> + Send + 'static) -> Self
  where
    Out: Clone + Sync,
  {
    let shared = fut.boxed().shared();
    Self::from_runner(1, move |_| Flow::pending(shared.clone().map(Ok)))
  }

  /// Wraps any step as a pipeline.
  pub fn from_step<S>(step: S) -> Self
  where
    S: Step<In, Output = Out>,
  {
    Self::from_runner(step.depth(), move |input| step.call(input))
  }

  /// Number of steps composed into this pipeline, counting the steps of
  /// nested pipelines.
  pub fn depth(&self) -> usize {
    self.depth
  }

  /// True if both handles share the same composed chain.
  pub fn ptr_eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.runner, &other.runner)
  }
}

impl<T: Send + 'static> Pipeline<T, T> {
  /// A pipeline that returns its input unchanged.
  pub fn identity() -> Self {
    Self::new(|input| input)
  }
}

impl<In, Out> Clone for Pipeline<In, Out> {
  fn clone(&self) -> Self {
    Self {
      runner: Arc::clone(&self.runner),
      depth: self.depth,
      _marker: PhantomData,
    }
  }
}

impl<In, Out> fmt::Debug for Pipeline<In, Out> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Pipeline")
      .field("input", &std::any::type_name::<In>())
      .field("output", &std::any::type_name::<Out>())
      .field("depth", &self.depth)
      .finish()
  }
}
