// pipekit/src/pipeline/mod.rs

//! Defines the `Pipeline<In, Out>` struct, its construction, composition and execution.

pub mod composition;
pub mod definition;
pub mod execution;

pub use definition::Pipeline;

use crate::core::step::Step;
use std::future::Future;

/// Builds a pipeline from a synchronous function.
pub fn pipe<In, Out>(f: impl Fn(In) -> Out + Send + Sync + 'static) -> Pipeline<In, Out>
where
  In: Send + 'static,
  Out: Send + 'static,
{
  Pipeline::new(f)
}

/// Builds a pipeline returning a constant, whatever its input.
pub fn pipe_value<In, Out>(value: Out) -> Pipeline<In, Out>
where
  In: Send + 'static,
  Out: Clone + Send + Sync + 'static,
{
  Pipeline::value(value)
}

/// Builds a pipeline from an asynchronous function.
pub fn pipe_async<In, Out, F, Fut>(f: F) -> Pipeline<In, Out>
where
  In: Send + 'static,
  Out: Send + 'static,
  F: Fn(In) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Out> + Send + 'static,
{
  Pipeline::from_async(f)
}

/// Builds a pipeline whose output is a shared future's result.
pub fn pipe_future<In, Out>(fut: impl Future<Output = Out> + Send + 'static) -> Pipeline<In, Out>
where
  In: Send + 'static,
  Out: Clone + Send + Sync + 'static,
{
  Pipeline::deferred(fut)
}

/// Builds a pipeline from an existing step; a pipeline comes back unchanged.
pub fn pipe_step<In, S>(step: S) -> Pipeline<In, S::Output>
where
  In: Send + 'static,
  S: Step<In>,
{
  step.into_pipeline()
}
