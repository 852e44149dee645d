// pipekit/src/middleware/extract.rs

//! `use_param`, `use_query` and `use_body`: read one request field, run it
//! through a step chain and store the result in the request state.

use crate::core::context_data::ContextData;
use crate::core::step::Step;
use crate::middleware::chain::{Middleware, Next};
use crate::middleware::context::RequestContext;
use crate::pipeline::Pipeline;
use serde_json::Value;
use std::sync::Arc;
use tracing::{event, Level};

/// Where an extractor reads its raw value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
  Param,
  Query,
  Body,
}

impl Source {
  fn read<C: RequestContext>(self, ctx: &C, key: &str) -> Option<Value> {
    match self {
      Source::Param => ctx.param(key),
      Source::Query => ctx.query(key),
      Source::Body => ctx.body(),
    }
  }
}

/// Describes one extraction: source, keys and the step chain for the raw value.
///
/// The raw value is `Option<Value>`: `None` when the request lacks the field.
pub struct Extractor<T> {
  source: Source,
  state_key: String,
  source_key: String,
  step: Pipeline<Option<Value>, T>,
}

/// Reads the route param named `state_key` into the state key `state_key`.
pub fn use_param(state_key: impl Into<String>) -> Extractor<Option<Value>> {
  Extractor::new(Source::Param, state_key.into())
}

/// Reads the query value named `state_key` into the state key `state_key`.
pub fn use_query(state_key: impl Into<String>) -> Extractor<Option<Value>> {
  Extractor::new(Source::Query, state_key.into())
}

/// Reads the parsed request body into the state key `"body"`.
pub fn use_body() -> Extractor<Option<Value>> {
  Extractor::new(Source::Body, "body".to_string())
}

impl Extractor<Option<Value>> {
  fn new(source: Source, state_key: String) -> Self {
    Self {
      source,
      source_key: state_key.clone(),
      state_key,
      step: Pipeline::identity(),
    }
  }
}

impl<T: Send + Sync + 'static> Extractor<T> {
  /// Reads from `key` instead of the state key. Ignored for the body.
  pub fn source_key(mut self, key: impl Into<String>) -> Self {
    self.source_key = key.into();
    self
  }

  /// Pipes the extracted value through `step` before it is stored.
  pub fn with<S>(self, step: S) -> Extractor<S::Output>
  where
    S: Step<T>,
  {
    Extractor {
      source: self.source,
      state_key: self.state_key,
      source_key: self.source_key,
      step: self.step.then(step),
    }
  }

  pub fn state_key(&self) -> &str {
    &self.state_key
  }

  /// Builds the middleware.
  ///
  /// The step chain's output, a success or an error value, is stored under
  /// the state key and `next` is called. If the chain raises, the error is
  /// returned and `next` is not called.
  pub fn into_middleware<C: RequestContext>(self) -> Middleware<C> {
    let extractor = Arc::new(self);
    Box::new(move |ctx: ContextData<C>, next: Next<C>| {
      let extractor = Arc::clone(&extractor);
      Box::pin(async move {
        let raw = {
          let guard = ctx.read();
          extractor.source.read(&*guard, &extractor.source_key)
        }; // guard dropped

        event!(
          Level::DEBUG,
          source = ?extractor.source,
          source_key = %extractor.source_key,
          state_key = %extractor.state_key,
          present = raw.is_some(),
          "Extracting request field."
        );

        let value = match extractor.step.call(raw).await {
          Ok(value) => value,
          Err(raised) => {
            event!(Level::ERROR, state_key = %extractor.state_key, error = %raised, "Extraction step chain raised.");
            return Err(raised);
          }
        };

        ctx.write().state_mut().insert(extractor.state_key.clone(), value);
        next(ctx).await
      })
    })
  }
}
