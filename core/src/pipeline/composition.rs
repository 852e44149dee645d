// pipekit/src/pipeline/composition.rs

//! Methods that append a step to a `Pipeline<In, Out>`, each returning a new
//! pipeline and leaving the receiver untouched.

use crate::core::flow::Flow;
use crate::core::step::Step;
use crate::pipeline::definition::Pipeline;
use futures::future::FutureExt;
use std::future::Future;
use std::sync::Arc;

impl<In, Out> Pipeline<In, Out>
where
  In: Send + 'static,
  Out: Send + 'static,
{
  /// Appends a synchronous step.
  ///
  /// If the chain so far is synchronous, `f` runs immediately and the new
  /// pipeline stays synchronous. If it is pending, `f` is mapped onto the
  /// pending value and only runs once the caller awaits the result.
  pub fn pipe<Next, F>(&self, f: F) -> Pipeline<In, Next>
  where
    Next: Send + 'static,
    F: Fn(Out) -> Next + Send + Sync + 'static,
  {
    let prev = Arc::clone(&self.runner);
    let f = Arc::new(f);
    Pipeline::from_runner(self.depth + 1, move |input| {
      let f = Arc::clone(&f);
      prev(input).map(move |res| res.map(|value| f(value)))
    })
  }

  /// Appends an asynchronous step. The pipeline is pending from here on,
  /// but synchronous steps before it still run eagerly on `call`.
  pub fn pipe_async<Next, F, Fut>(&self, f: F) -> Pipeline<In, Next>
  where
    Next: Send + 'static,
    F: Fn(Out) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Next> + Send + 'static,
  {
    let prev = Arc::clone(&self.runner);
    let f = Arc::new(f);
    Pipeline::from_runner(self.depth + 1, move |input| {
      let f = Arc::clone(&f);
      prev(input).and_then(move |res| match res {
        Ok(value) => Flow::pending(f(value).map(Ok)),
        Err(raised) => Flow::Ready(Err(raised)),
      })
    })
  }

  /// Appends any [`Step`], including another pipeline, whose steps then
  /// count towards `depth()`.
  ///
  /// Synchronous on both sides means synchronous overall.
  pub fn then<S>(&self, step: S) -> Pipeline<In, S::Output>
  where
    S: Step<Out>,
  {
    let prev = Arc::clone(&self.runner);
    let depth = self.depth + step.depth();
    let step = Arc::new(step);
    Pipeline::from_runner(depth, move |input| {
      let step = Arc::clone(&step);
      prev(input).and_then(move |res| match res {
        Ok(value) => step.call(value),
        Err(raised) => Flow::Ready(Err(raised)),
      })
    })
  }

  /// Appends a step that always sees the resolved upstream value.
  ///
  /// The output is pending even when every step is synchronous.
  pub fn flat_pipe<Next, F>(&self, f: F) -> Pipeline<In, Next>
  where
    Next: Send + 'static,
    F: Fn(Out) -> Next + Send + Sync + 'static,
  {
    let prev = Arc::clone(&self.runner);
    let f = Arc::new(f);
    Pipeline::from_runner(self.depth + 1, move |input| {
      let upstream = prev(input);
      let f = Arc::clone(&f);
      Flow::pending(async move {
        let value = upstream.await?;
        Ok(f(value))
      })
    })
  }
}
