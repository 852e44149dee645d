// pipekit/src/validation/schema.rs

//! Schema-style validators: one `parse` entry point that reports every issue.
//!
//! Any type implementing [`Schema`] plugs into `validate_pipe`. The builders
//! here (`string()`, `number()`, `boolean()`, `object()`) are a small
//! built-in family of such schemas.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::net::IpAddr;
use std::sync::Arc;
use thiserror::Error;

/// A validator with a single "parse and report all errors" contract.
pub trait Schema: Send + Sync + 'static {
  type Output: Send + 'static;
  type Error: Send + 'static;

  fn parse(&self, input: &Value) -> Result<Self::Output, Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum IssueCode {
  Required,
  InvalidType { expected: &'static str, received: &'static str },
  TooSmall { minimum: f64 },
  TooBig { maximum: f64 },
  NotInteger,
  InvalidString { validation: &'static str },
  UnrecognizedKeys { keys: Vec<String> },
  Deserialize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaIssue {
  pub path: Vec<String>,
  #[serde(flatten)]
  pub code: IssueCode,
  pub message: String,
}

/// Every issue found in one `parse` call.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("schema validation failed with {} issue(s)", .issues.len())]
pub struct SchemaError {
  pub issues: Vec<SchemaIssue>,
}

impl SchemaError {
  /// Issues whose path starts at the given top-level key.
  pub fn issues_at<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a SchemaIssue> + 'a {
    self.issues.iter().filter(move |issue| issue.path.first().map(String::as_str) == Some(key))
  }
}

/// A node of the built-in schema family.
///
/// `check` receives `None` for a missing value, pushes any issues, and
/// returns the parsed value to keep (or `None` to leave it out).
pub trait SchemaNode: Send + Sync + 'static {
  fn check(&self, value: Option<&Value>, path: &[String], issues: &mut Vec<SchemaIssue>) -> Option<Value>;

  /// Deserializes the parsed value into `T` after validation.
  fn typed<T>(self) -> Typed<Self, T>
  where
    Self: Sized,
    T: DeserializeOwned + Send + 'static,
  {
    Typed {
      inner: self,
      _marker: PhantomData,
    }
  }
}

impl<N: SchemaNode> Schema for N {
  type Output = Value;
  type Error = SchemaError;

  fn parse(&self, input: &Value) -> Result<Value, SchemaError> {
    let mut issues = Vec::new();
    let parsed = self.check(Some(input), &[], &mut issues);
    if issues.is_empty() {
      Ok(parsed.unwrap_or(Value::Null))
    } else {
      Err(SchemaError { issues })
    }
  }
}

/// A schema node whose output is deserialized into `T`.
pub struct Typed<S, T> {
  inner: S,
  _marker: PhantomData<fn() -> T>,
}

impl<S, T> Schema for Typed<S, T>
where
  S: SchemaNode,
  T: DeserializeOwned + Send + 'static,
{
  type Output = T;
  type Error = SchemaError;

  fn parse(&self, input: &Value) -> Result<T, SchemaError> {
    let parsed = Schema::parse(&self.inner, input)?;
    serde_json::from_value(parsed).map_err(|err| SchemaError {
      issues: vec![SchemaIssue {
        path: Vec::new(),
        code: IssueCode::Deserialize,
        message: err.to_string(),
      }],
    })
  }
}

fn kind_of(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

fn issue(path: &[String], code: IssueCode, message: impl Into<String>) -> SchemaIssue {
  SchemaIssue {
    path: path.to_vec(),
    code,
    message: message.into(),
  }
}

/// Shared handling of missing and null values. Returns the present value,
/// or `None` when the caller should stop (optional absent, or issue pushed).
fn present<'v>(
  value: Option<&'v Value>,
  optional: bool,
  expected: &'static str,
  path: &[String],
  issues: &mut Vec<SchemaIssue>,
) -> Option<&'v Value> {
  match value {
    None | Some(Value::Null) if optional => None,
    None => {
      issues.push(issue(path, IssueCode::Required, "Required"));
      None
    }
    Some(found) if kind_of(found) != expected => {
      let received = kind_of(found);
      issues.push(issue(
        path,
        IssueCode::InvalidType { expected, received },
        format!("Expected {expected}, received {received}"),
      ));
      None
    }
    Some(found) => Some(found),
  }
}

#[derive(Debug, Clone, Default)]
pub struct StringSchema {
  optional: bool,
  min_len: Option<usize>,
  max_len: Option<usize>,
  includes: Option<String>,
  ip: bool,
}

pub fn string() -> StringSchema {
  StringSchema::default()
}

impl StringSchema {
  pub fn optional(mut self) -> Self {
    self.optional = true;
    self
  }

  pub fn min_len(mut self, len: usize) -> Self {
    self.min_len = Some(len);
    self
  }

  pub fn max_len(mut self, len: usize) -> Self {
    self.max_len = Some(len);
    self
  }

  pub fn includes(mut self, needle: impl Into<String>) -> Self {
    self.includes = Some(needle.into());
    self
  }

  /// Requires an IPv4 or IPv6 address.
  pub fn ip(mut self) -> Self {
    self.ip = true;
    self
  }
}

impl SchemaNode for StringSchema {
  fn check(&self, value: Option<&Value>, path: &[String], issues: &mut Vec<SchemaIssue>) -> Option<Value> {
    let found = present(value, self.optional, "string", path, issues)?;
    let text = found.as_str().unwrap_or_default();
    let before = issues.len();
    let len = text.chars().count();

    if let Some(min) = self.min_len.filter(|min| len < *min) {
      issues.push(issue(
        path,
        IssueCode::TooSmall { minimum: min as f64 },
        format!("String must contain at least {min} character(s)"),
      ));
    }
    if let Some(max) = self.max_len.filter(|max| len > *max) {
      issues.push(issue(
        path,
        IssueCode::TooBig { maximum: max as f64 },
        format!("String must contain at most {max} character(s)"),
      ));
    }
    if let Some(needle) = self.includes.as_deref().filter(|needle| !text.contains(needle)) {
      issues.push(issue(
        path,
        IssueCode::InvalidString { validation: "includes" },
        format!("Invalid input: must include \"{needle}\""),
      ));
    }
    if self.ip && text.parse::<IpAddr>().is_err() {
      issues.push(issue(path, IssueCode::InvalidString { validation: "ip" }, "Invalid ip"));
    }

    (issues.len() == before).then(|| found.clone())
  }
}

#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
  optional: bool,
  int: bool,
  min: Option<f64>,
  max: Option<f64>,
}

pub fn number() -> NumberSchema {
  NumberSchema::default()
}

impl NumberSchema {
  pub fn optional(mut self) -> Self {
    self.optional = true;
    self
  }

  pub fn int(mut self) -> Self {
    self.int = true;
    self
  }

  pub fn min(mut self, min: f64) -> Self {
    self.min = Some(min);
    self
  }

  pub fn max(mut self, max: f64) -> Self {
    self.max = Some(max);
    self
  }
}

impl SchemaNode for NumberSchema {
  fn check(&self, value: Option<&Value>, path: &[String], issues: &mut Vec<SchemaIssue>) -> Option<Value> {
    let found = present(value, self.optional, "number", path, issues)?;
    let number = found.as_f64().unwrap_or_default();
    let before = issues.len();

    if self.int && number.fract() != 0.0 {
      issues.push(issue(path, IssueCode::NotInteger, "Expected integer, received float"));
    }
    if let Some(min) = self.min.filter(|min| number < *min) {
      issues.push(issue(
        path,
        IssueCode::TooSmall { minimum: min },
        format!("Number must be greater than or equal to {min}"),
      ));
    }
    if let Some(max) = self.max.filter(|max| number > *max) {
      issues.push(issue(
        path,
        IssueCode::TooBig { maximum: max },
        format!("Number must be less than or equal to {max}"),
      ));
    }

    (issues.len() == before).then(|| found.clone())
  }
}

#[derive(Debug, Clone, Default)]
pub struct BooleanSchema {
  optional: bool,
}

pub fn boolean() -> BooleanSchema {
  BooleanSchema::default()
}

impl BooleanSchema {
  pub fn optional(mut self) -> Self {
    self.optional = true;
    self
  }
}

impl SchemaNode for BooleanSchema {
  fn check(&self, value: Option<&Value>, path: &[String], issues: &mut Vec<SchemaIssue>) -> Option<Value> {
    present(value, self.optional, "boolean", path, issues).cloned()
  }
}

/// An object with declared fields. Unknown keys are stripped from the output,
/// or reported as an `UnrecognizedKeys` issue once `strict()` is set.
#[derive(Clone, Default)]
pub struct ObjectSchema {
  optional: bool,
  strict: bool,
  fields: Vec<(String, Arc<dyn SchemaNode>)>,
}

pub fn object() -> ObjectSchema {
  ObjectSchema::default()
}

impl ObjectSchema {
  pub fn field(mut self, name: impl Into<String>, node: impl SchemaNode) -> Self {
    self.fields.push((name.into(), Arc::new(node)));
    self
  }

  pub fn optional(mut self) -> Self {
    self.optional = true;
    self
  }

  pub fn strict(mut self) -> Self {
    self.strict = true;
    self
  }
}

impl std::fmt::Debug for ObjectSchema {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ObjectSchema")
      .field("optional", &self.optional)
      .field("strict", &self.strict)
      .field("fields", &self.fields.iter().map(|(name, _)| name).collect::<Vec<_>>())
      .finish()
  }
}

impl SchemaNode for ObjectSchema {
  fn check(&self, value: Option<&Value>, path: &[String], issues: &mut Vec<SchemaIssue>) -> Option<Value> {
    let found = present(value, self.optional, "object", path, issues)?;
    let input = found.as_object()?;
    let before = issues.len();
    let mut output = Map::new();

    for (name, node) in &self.fields {
      let mut field_path = path.to_vec();
      field_path.push(name.clone());
      if let Some(parsed) = node.check(input.get(name), &field_path, issues) {
        output.insert(name.clone(), parsed);
      }
    }

    if self.strict {
      let unknown: Vec<String> = input
        .keys()
        .filter(|key| !self.fields.iter().any(|(name, _)| name == *key))
        .cloned()
        .collect();
      if !unknown.is_empty() {
        let listed = unknown.iter().map(|key| format!("'{key}'")).collect::<Vec<_>>().join(", ");
        issues.push(issue(
          path,
          IssueCode::UnrecognizedKeys { keys: unknown },
          format!("Unrecognized key(s) in object: {listed}"),
        ));
      }
    }

    (issues.len() == before).then_some(Value::Object(output))
  }
}
