// pipekit/src/middleware/context.rs

//! The request context seen by the extraction middleware.

use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// What the extraction middleware needs from a request: raw field lookup
/// and a state map to write results into.
///
/// Framework adapters implement this for their own context type.
pub trait RequestContext: Send + Sync + 'static {
  fn param(&self, key: &str) -> Option<Value>;
  fn query(&self, key: &str) -> Option<Value>;
  fn body(&self) -> Option<Value>;
  fn state(&self) -> &State;
  fn state_mut(&mut self) -> &mut State;
}

/// Per-request storage keyed by name, holding values of any type.
///
/// Middleware stores whatever its step chain produced (a success value or
/// an error value); handlers read it back with `get::<T>`.
#[derive(Default)]
pub struct State(HashMap<String, Box<dyn Any + Send + Sync>>);

impl State {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert<T: Send + Sync + 'static>(&mut self, key: impl Into<String>, value: T) {
    self.0.insert(key.into(), Box::new(value));
  }

  /// `None` if the key is missing or holds a value of another type.
  pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
    self.0.get(key).and_then(|value| value.downcast_ref::<T>())
  }

  pub fn remove<T: 'static>(&mut self, key: &str) -> Option<T> {
    match self.0.remove(key)?.downcast::<T>() {
      Ok(value) => Some(*value),
      Err(other) => {
        self.0.insert(key.to_string(), other);
        None
      }
    }
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.0.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl fmt::Debug for State {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.0.keys()).finish()
  }
}

/// An in-memory [`RequestContext`]: route params, query string and a parsed body.
#[derive(Debug, Default)]
pub struct HttpContext {
  pub params: HashMap<String, String>,
  pub query: HashMap<String, String>,
  pub body: Option<Value>,
  pub state: State,
}

impl HttpContext {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.params.insert(key.into(), value.into());
    self
  }

  pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.query.insert(key.into(), value.into());
    self
  }

  pub fn with_body(mut self, body: Value) -> Self {
    self.body = Some(body);
    self
  }
}

impl RequestContext for HttpContext {
  fn param(&self, key: &str) -> Option<Value> {
    self.params.get(key).cloned().map(Value::String)
  }

  fn query(&self, key: &str) -> Option<Value> {
    self.query.get(key).cloned().map(Value::String)
  }

  fn body(&self) -> Option<Value> {
    self.body.clone()
  }

  fn state(&self) -> &State {
    &self.state
  }

  fn state_mut(&mut self) -> &mut State {
    &mut self.state
  }
}
