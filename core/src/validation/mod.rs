// pipekit/src/validation/mod.rs

//! The validation adapter.
//!
//! `validate_pipe` turns any [`Validator`] into a pipeline step whose output
//! is `Result<V::Output, V::Error>`, a returned value and never a raised
//! error. Two validator families implement `Validator`:
//!
//!  - schema-style: anything implementing [`Schema`] (one `parse` entry point);
//!    failures are the schema's own error type, passed through untouched.
//!  - class-style: [`Class<T>`] for a serde type `T: ClassSchema` with
//!    declared fields and constraints; failures are a [`ClassValidatorError`]
//!    with one entry per failing field.
//!
//! The step is always pending, whichever family is used.

pub mod class;
pub mod schema;

pub use class::{class, Class, ClassSchema, ClassValidatorError, Constraint, Field, FieldType, FieldViolation};
pub use schema::{IssueCode, Schema, SchemaError, SchemaIssue, SchemaNode};

use crate::core::flow::Flow;
use crate::core::step::Step;
use crate::error::PipeResult;
use crate::pipeline::Pipeline;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{event, Level};

/// Options for [`validate_pipe_with`].
///
/// They tune the class-style family; schema-style validators carry their own
/// configuration (e.g. `strict()`) and ignore these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidateOptions {
  /// Skip every constraint except `IsDefined` on fields that are absent or null.
  pub skip_missing_properties: bool,
  /// Coerce raw field values to the declared `FieldType` before checking.
  pub implicit_conversion: bool,
  /// Leave the offending value out of each `FieldViolation`.
  pub hide_values: bool,
}

/// Something that maps a JSON input to either a valid value or a structured error.
#[async_trait]
pub trait Validator: Send + Sync + 'static {
  type Output: Send + 'static;
  type Error: Send + 'static;

  async fn validate(&self, input: Value, options: &ValidateOptions) -> Result<Self::Output, Self::Error>;
}

#[async_trait]
impl<S: Schema> Validator for S {
  type Output = S::Output;
  type Error = S::Error;

  async fn validate(&self, input: Value, _options: &ValidateOptions) -> Result<Self::Output, Self::Error> {
    let result = self.parse(&input);
    if result.is_err() {
      event!(
        Level::DEBUG,
        schema = %std::any::type_name::<S>(),
        "Schema validator returned a failure value."
      );
    }
    result
  }
}

/// The step behind [`validate_pipe`].
pub struct ValidatePipe<V> {
  validator: Arc<V>,
  options: Arc<ValidateOptions>,
}

impl<V: Validator> ValidatePipe<V> {
  pub fn new(validator: V, options: ValidateOptions) -> Self {
    Self {
      validator: Arc::new(validator),
      options: Arc::new(options),
    }
  }
}

impl<I, V> Step<I> for ValidatePipe<V>
where
  I: Into<Value> + Send + 'static,
  V: Validator,
{
  type Output = Result<V::Output, V::Error>;

  fn call(&self, input: I) -> Flow<PipeResult<Self::Output>> {
    let validator = Arc::clone(&self.validator);
    let options = Arc::clone(&self.options);
    let value: Value = input.into();
    Flow::pending(async move { Ok(validator.validate(value, &options).await) })
  }
}

/// Builds a validation step with default options.
///
/// The input can be anything convertible into a `serde_json::Value`,
/// including `Option<Value>` where `None` becomes `null`.
pub fn validate_pipe<I, V>(validator: V) -> Pipeline<I, Result<V::Output, V::Error>>
where
  I: Into<Value> + Send + 'static,
  V: Validator,
{
  validate_pipe_with(validator, ValidateOptions::default())
}

pub fn validate_pipe_with<I, V>(validator: V, options: ValidateOptions) -> Pipeline<I, Result<V::Output, V::Error>>
where
  I: Into<Value> + Send + 'static,
  V: Validator,
{
  Pipeline::from_step(ValidatePipe::new(validator, options))
}
