// pipekit/src/pipes/default.rs

//! Fallback pipes for absent inputs.

use crate::pipeline::Pipeline;
use serde_json::Value;

/// Substitutes `fallback` when the input is `None`. Any present value,
/// including `0`, `false` or an empty string, passes through unchanged.
pub fn default_value_pipe<T>(fallback: T) -> Pipeline<Option<T>, T>
where
  T: Clone + Send + Sync + 'static,
{
  Pipeline::new(move |input: Option<T>| input.unwrap_or_else(|| fallback.clone()))
}

/// JSON flavor of [`default_value_pipe`]: a missing value (`None`) and an
/// explicit `null` both count as absent.
pub fn default_json_value_pipe(fallback: Value) -> Pipeline<Option<Value>, Value> {
  Pipeline::new(move |input: Option<Value>| match input {
    None | Some(Value::Null) => fallback.clone(),
    Some(present) => present,
  })
}
