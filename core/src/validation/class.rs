// pipekit/src/validation/class.rs

//! Class-style validators: a serde type that declares its fields and the
//! constraints on each.
//!
//! Validation keeps only the declared fields of the input (unknown fields are
//! dropped, never rejected), optionally coerces them to their declared type,
//! checks every field concurrently and only then builds the instance. A
//! failure lists each failing field once, with all of its failed constraints.

use super::{ValidateOptions, Validator};
use async_trait::async_trait;
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::net::IpAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{event, Level};

/// Implemented by types that can be validated with [`class`].
///
/// ```ignore
/// impl ClassSchema for User {
///   fn fields() -> Vec<Field> {
///     vec![
///       Field::new("name", FieldType::String).rule(Constraint::IsString),
///       Field::new("age", FieldType::Number).rule(Constraint::IsNumber).rule(Constraint::Min(0.0)),
///     ]
///   }
/// }
/// ```
pub trait ClassSchema: DeserializeOwned + Send + Sync + 'static {
  fn fields() -> Vec<Field>;
}

/// Declared type of a field, used for implicit conversion only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
  #[default]
  Any,
  String,
  Number,
  Integer,
  Boolean,
}

#[derive(Clone)]
pub enum Constraint {
  IsDefined,
  IsString,
  IsNumber,
  IsInt,
  IsBoolean,
  MinLength(usize),
  MaxLength(usize),
  Min(f64),
  Max(f64),
  Contains(String),
  IsIn(Vec<Value>),
  IsIp,
  Custom {
    name: &'static str,
    message: String,
    check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
  },
}

impl Constraint {
  pub fn custom(
    name: &'static str,
    message: impl Into<String>,
    check: impl Fn(&Value) -> bool + Send + Sync + 'static,
  ) -> Self {
    Constraint::Custom {
      name,
      message: message.into(),
      check: Arc::new(check),
    }
  }

  /// Key under which a failure of this constraint is reported.
  pub fn name(&self) -> &'static str {
    match self {
      Constraint::IsDefined => "isDefined",
      Constraint::IsString => "isString",
      Constraint::IsNumber => "isNumber",
      Constraint::IsInt => "isInt",
      Constraint::IsBoolean => "isBoolean",
      Constraint::MinLength(_) => "minLength",
      Constraint::MaxLength(_) => "maxLength",
      Constraint::Min(_) => "min",
      Constraint::Max(_) => "max",
      Constraint::Contains(_) => "contains",
      Constraint::IsIn(_) => "isIn",
      Constraint::IsIp => "isIp",
      Constraint::Custom { name, .. } => *name,
    }
  }

  fn holds(&self, value: Option<&Value>) -> bool {
    let text = value.and_then(Value::as_str);
    let number = value.and_then(Value::as_f64);
    match self {
      Constraint::IsDefined => !matches!(value, None | Some(Value::Null)),
      Constraint::IsString => text.is_some(),
      Constraint::IsNumber => number.is_some(),
      Constraint::IsInt => number.is_some_and(|n| n.fract() == 0.0),
      Constraint::IsBoolean => matches!(value, Some(Value::Bool(_))),
      Constraint::MinLength(min) => text.is_some_and(|s| s.chars().count() >= *min),
      Constraint::MaxLength(max) => text.is_some_and(|s| s.chars().count() <= *max),
      Constraint::Min(min) => number.is_some_and(|n| n >= *min),
      Constraint::Max(max) => number.is_some_and(|n| n <= *max),
      Constraint::Contains(needle) => text.is_some_and(|s| s.contains(needle.as_str())),
      Constraint::IsIn(allowed) => value.is_some_and(|v| allowed.contains(v)),
      Constraint::IsIp => text.is_some_and(|s| s.parse::<IpAddr>().is_ok()),
      Constraint::Custom { check, .. } => check(value.unwrap_or(&Value::Null)),
    }
  }

  fn message(&self, property: &str) -> String {
    match self {
      Constraint::IsDefined => format!("{property} should not be null or undefined"),
      Constraint::IsString => format!("{property} must be a string"),
      Constraint::IsNumber => format!("{property} must be a number conforming to the specified constraints"),
      Constraint::IsInt => format!("{property} must be an integer number"),
      Constraint::IsBoolean => format!("{property} must be a boolean value"),
      Constraint::MinLength(min) => format!("{property} must be longer than or equal to {min} characters"),
      Constraint::MaxLength(max) => format!("{property} must be shorter than or equal to {max} characters"),
      Constraint::Min(min) => format!("{property} must not be less than {min}"),
      Constraint::Max(max) => format!("{property} must not be greater than {max}"),
      Constraint::Contains(needle) => format!("{property} must contain a {needle} string"),
      Constraint::IsIn(allowed) => {
        let listed = allowed.iter().map(Value::to_string).collect::<Vec<_>>().join(", ");
        format!("{property} must be one of the following values: {listed}")
      }
      Constraint::IsIp => format!("{property} must be an ip address"),
      Constraint::Custom { message, .. } => format!("{property} {message}"),
    }
  }
}

impl fmt::Debug for Constraint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Constraint::MinLength(n) | Constraint::MaxLength(n) => write!(f, "{}({n})", self.name()),
      Constraint::Min(n) | Constraint::Max(n) => write!(f, "{}({n})", self.name()),
      Constraint::Contains(needle) => write!(f, "contains({needle:?})"),
      Constraint::IsIn(allowed) => write!(f, "isIn({allowed:?})"),
      other => f.write_str(other.name()),
    }
  }
}

/// A declared field: its name, declared type and constraints.
#[derive(Debug, Clone)]
pub struct Field {
  name: String,
  ty: FieldType,
  optional: bool,
  constraints: Vec<Constraint>,
}

impl Field {
  pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
    Self {
      name: name.into(),
      ty,
      optional: false,
      constraints: Vec::new(),
    }
  }

  /// Absent or null values skip every constraint, `IsDefined` included.
  pub fn optional(mut self) -> Self {
    self.optional = true;
    self
  }

  pub fn rule(mut self, constraint: Constraint) -> Self {
    self.constraints.push(constraint);
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  fn coerce(&self, value: Value) -> Value {
    match (self.ty, value) {
      (FieldType::String, Value::Number(n)) => Value::String(n.to_string()),
      (FieldType::String, Value::Bool(b)) => Value::String(b.to_string()),
      (FieldType::Number, Value::String(s)) => {
        let parsed = s.trim().parse::<f64>();
        match parsed {
          Ok(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Value::Number(Number::from(n as i64)),
          Ok(n) => Number::from_f64(n).map_or(Value::String(s), Value::Number),
          Err(_) => Value::String(s),
        }
      }
      (FieldType::Integer, Value::String(s)) => {
        let parsed = s.trim().parse::<i64>();
        parsed.map_or(Value::String(s), |n| Value::Number(Number::from(n)))
      }
      (FieldType::Boolean, Value::String(s)) if s == "true" || s == "false" => Value::Bool(s == "true"),
      (_, other) => other,
    }
  }

  async fn check(&self, value: Option<&Value>, options: &ValidateOptions) -> Option<FieldViolation> {
    let absent = matches!(value, None | Some(Value::Null));
    if absent && self.optional {
      return None;
    }
    let skip_missing = absent && options.skip_missing_properties;

    let failed: BTreeMap<String, String> = self
      .constraints
      .iter()
      .filter(|constraint| !skip_missing || matches!(constraint, Constraint::IsDefined))
      .filter(|constraint| !constraint.holds(value))
      .map(|constraint| (constraint.name().to_string(), constraint.message(&self.name)))
      .collect();

    if failed.is_empty() {
      return None;
    }
    Some(FieldViolation {
      property: self.name.clone(),
      value: if options.hide_values { None } else { value.cloned() },
      constraints: failed,
    })
  }
}

/// One failing field and every constraint it failed, keyed by constraint name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
  pub property: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value: Option<Value>,
  pub constraints: BTreeMap<String, String>,
}

impl FieldViolation {
  pub fn failed(&self, constraint: &str) -> bool {
    self.constraints.contains_key(constraint)
  }
}

/// Returned by the class-style family: one detail per failing field.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{target} failed validation on {} field(s)", .details.len())]
pub struct ClassValidatorError {
  pub target: &'static str,
  pub details: Vec<FieldViolation>,
}

impl ClassValidatorError {
  fn single(target: &'static str, constraint: &str, message: String, value: Option<Value>) -> Self {
    Self {
      target,
      details: vec![FieldViolation {
        property: String::new(),
        value,
        constraints: BTreeMap::from([(constraint.to_string(), message)]),
      }],
    }
  }

  pub fn detail(&self, property: &str) -> Option<&FieldViolation> {
    self.details.iter().find(|detail| detail.property == property)
  }
}

/// The class-style validator for `T`; build it with [`class`].
pub struct Class<T> {
  fields: Arc<Vec<Field>>,
  _marker: PhantomData<fn() -> T>,
}

pub fn class<T: ClassSchema>() -> Class<T> {
  Class {
    fields: Arc::new(T::fields()),
    _marker: PhantomData,
  }
}

impl<T> Clone for Class<T> {
  fn clone(&self) -> Self {
    Self {
      fields: Arc::clone(&self.fields),
      _marker: PhantomData,
    }
  }
}

impl<T> Class<T> {
  /// Keeps the declared fields of `raw`, converted when requested.
  fn instantiate(&self, mut raw: Map<String, Value>, options: &ValidateOptions) -> Map<String, Value> {
    let mut instance = Map::new();
    for field in self.fields.iter() {
      if let Some(value) = raw.remove(field.name()) {
        let value = if options.implicit_conversion { field.coerce(value) } else { value };
        instance.insert(field.name().to_string(), value);
      }
    }
    instance
  }
}

#[async_trait]
impl<T: ClassSchema> Validator for Class<T> {
  type Output = T;
  type Error = ClassValidatorError;

  async fn validate(&self, input: Value, options: &ValidateOptions) -> Result<T, ClassValidatorError> {
    let target = std::any::type_name::<T>();
    let raw = match input {
      Value::Object(raw) => raw,
      other => {
        return Err(ClassValidatorError::single(
          target,
          "unknownValue",
          "an unknown value was passed to the validate function".to_string(),
          (!options.hide_values).then_some(other),
        ))
      }
    };

    let instance = self.instantiate(raw, options);
    let checks = self
      .fields
      .iter()
      .map(|field| field.check(instance.get(field.name()), options));
    let details: Vec<FieldViolation> = join_all(checks).await.into_iter().flatten().collect();

    if !details.is_empty() {
      event!(
        Level::DEBUG,
        target_type = %target,
        failing_fields = details.len(),
        "Class validator returned a failure value."
      );
      return Err(ClassValidatorError { target, details });
    }

    serde_json::from_value(Value::Object(instance))
      .map_err(|err| ClassValidatorError::single(target, "instantiate", err.to_string(), None))
  }
}
