// pipekit/src/core/flow.rs

//! Defines `Flow<T>`, the value-or-future returned by every step.

use futures::future::{self, BoxFuture, FutureExt};
use std::fmt;
use std::future::{Future, IntoFuture};

/// The output of a step: either already available or still pending.
///
/// A chain of synchronous steps only ever produces `Ready`. Once a step
/// returns `Pending`, later steps are folded into that future and run when
/// the consumer awaits it.
pub enum Flow<T> {
  Ready(T),
  Pending(BoxFuture<'static, T>),
}

impl<T: Send + 'static> Flow<T> {
  pub fn pending(fut: impl Future<Output = T> + Send + 'static) -> Self {
    Flow::Pending(fut.boxed())
  }

  pub fn is_ready(&self) -> bool {
    matches!(self, Flow::Ready(_))
  }

  pub fn is_pending(&self) -> bool {
    !self.is_ready()
  }

  /// Returns the value if it is available without awaiting.
  pub fn now(self) -> Option<T> {
    match self {
      Flow::Ready(value) => Some(value),
      Flow::Pending(_) => None,
    }
  }

  /// Applies `f` to the value. A pending value is not polled; `f` runs
  /// when the resulting future is.
  pub fn map<U, F>(self, f: F) -> Flow<U>
  where
    U: Send + 'static,
    F: FnOnce(T) -> U + Send + 'static,
  {
    match self {
      Flow::Ready(value) => Flow::Ready(f(value)),
      Flow::Pending(fut) => Flow::Pending(fut.map(f).boxed()),
    }
  }

  /// Chains a step that itself produces a `Flow`.
  pub fn and_then<U, F>(self, f: F) -> Flow<U>
  where
    U: Send + 'static,
    F: FnOnce(T) -> Flow<U> + Send + 'static,
  {
    match self {
      Flow::Ready(value) => f(value),
      Flow::Pending(fut) => Flow::pending(async move { f(fut.await).await }),
    }
  }

  /// Forces the value through a future, even if it is ready.
  pub fn defer(self) -> Self {
    match self {
      Flow::Ready(value) => Flow::pending(future::ready(value)),
      pending => pending,
    }
  }
}

impl<T: Send + 'static> IntoFuture for Flow<T> {
  type Output = T;
  type IntoFuture = BoxFuture<'static, T>;

  fn into_future(self) -> Self::IntoFuture {
    match self {
      Flow::Ready(value) => future::ready(value).boxed(),
      Flow::Pending(fut) => fut,
    }
  }
}

impl<T> From<BoxFuture<'static, T>> for Flow<T> {
  fn from(fut: BoxFuture<'static, T>) -> Self {
    Flow::Pending(fut)
  }
}

impl<T: fmt::Debug> fmt::Debug for Flow<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Flow::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
      Flow::Pending(_) => f.write_str("Pending(..)"),
    }
  }
}
