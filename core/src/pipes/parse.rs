// pipekit/src/pipes/parse.rs

//! Parsing pipes. Each is synchronous and returns `Result<T, ParseError>` as
//! its output value; none of them raise.

use crate::pipeline::Pipeline;
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::Serialize;
use thiserror::Error;

/// The one error value shared by every parsing pipe.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("cannot parse {input:?} as {expected}")]
pub struct ParseError {
  pub expected: &'static str,
  pub input: String,
}

impl ParseError {
  pub fn new(expected: &'static str, input: impl Into<String>) -> Self {
    Self {
      expected,
      input: input.into(),
    }
  }
}

/// Parses the leading decimal integer of the input. Leading whitespace and a
/// sign are allowed and trailing content is ignored, so `"42px"` is `42` but
/// `"px42"` is an error.
pub fn parse_int_pipe<S>() -> Pipeline<S, Result<i64, ParseError>>
where
  S: AsRef<str> + Send + 'static,
{
  Pipeline::new(|input: S| parse_int(input.as_ref()))
}

/// Parses the leading decimal or scientific-notation number of the input.
pub fn parse_float_pipe<S>() -> Pipeline<S, Result<f64, ParseError>>
where
  S: AsRef<str> + Send + 'static,
{
  Pipeline::new(|input: S| parse_float(input.as_ref()))
}

/// Accepts exactly `"true"` and `"false"`.
pub fn parse_bool_pipe<S>() -> Pipeline<S, Result<bool, ParseError>>
where
  S: AsRef<str> + Send + 'static,
{
  Pipeline::new(|input: S| match input.as_ref() {
    "true" => Ok(true),
    "false" => Ok(false),
    other => Err(ParseError::new("bool", other)),
  })
}

/// Accepts only the serialized names of `E`'s unit variants, honoring
/// `#[serde(rename = "...")]`.
pub fn parse_enum_pipe<S, E>() -> Pipeline<S, Result<E, ParseError>>
where
  S: AsRef<str> + Send + 'static,
  E: DeserializeOwned + Send + 'static,
{
  Pipeline::new(|input: S| {
    let raw = input.as_ref();
    let de: StrDeserializer<'_, ValueError> = raw.into_deserializer();
    E::deserialize(de).map_err(|_| ParseError::new(std::any::type_name::<E>(), raw))
  })
}

/// Parses the input as JSON text into `T`.
pub fn parse_json_pipe<S, T>() -> Pipeline<S, Result<T, ParseError>>
where
  S: AsRef<str> + Send + 'static,
  T: DeserializeOwned + Send + 'static,
{
  Pipeline::new(|input: S| {
    let raw = input.as_ref();
    serde_json::from_str::<T>(raw).map_err(|_| ParseError::new("JSON", raw))
  })
}

fn parse_int(input: &str) -> Result<i64, ParseError> {
  let trimmed = input.trim_start();
  let bytes = trimmed.as_bytes();
  let mut end = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));
  let digits_start = end;
  while end < bytes.len() && bytes[end].is_ascii_digit() {
    end += 1;
  }
  if end == digits_start {
    return Err(ParseError::new("integer", input));
  }
  trimmed[..end]
    .parse::<i64>()
    .map_err(|_| ParseError::new("integer", input))
}

fn parse_float(input: &str) -> Result<f64, ParseError> {
  let trimmed = input.trim_start();
  let bytes = trimmed.as_bytes();
  let mut end = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));

  if trimmed[end..].starts_with("Infinity") {
    let value = if bytes.first() == Some(&b'-') { f64::NEG_INFINITY } else { f64::INFINITY };
    return Ok(value);
  }

  let mut digits = 0;
  while end < bytes.len() && bytes[end].is_ascii_digit() {
    end += 1;
    digits += 1;
  }
  if end < bytes.len() && bytes[end] == b'.' {
    end += 1;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
      end += 1;
      digits += 1;
    }
  }
  if digits == 0 {
    return Err(ParseError::new("float", input));
  }

  // Exponent only counts when at least one digit follows it.
  if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
    let mut exp_end = end + 1;
    if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
      exp_end += 1;
    }
    let exp_digits_start = exp_end;
    while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
      exp_end += 1;
    }
    if exp_end > exp_digits_start {
      end = exp_end;
    }
  }

  trimmed[..end]
    .parse::<f64>()
    .map_err(|_| ParseError::new("float", input))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn int_prefix_rules() {
    assert_eq!(parse_int("1234"), Ok(1234));
    assert_eq!(parse_int("  -17"), Ok(-17));
    assert_eq!(parse_int("42px"), Ok(42));
    assert!(parse_int("ab123cd").is_err());
    assert!(parse_int("").is_err());
    assert!(parse_int("-").is_err());
    assert!(parse_int("99999999999999999999").is_err());
  }

  #[test]
  fn float_prefix_rules() {
    assert_eq!(parse_float("1234.567"), Ok(1234.567));
    assert_eq!(parse_float("1.234567e3"), Ok(1234.567));
    assert_eq!(parse_float(".5"), Ok(0.5));
    assert_eq!(parse_float("3e"), Ok(3.0));
    assert_eq!(parse_float("2E-2x"), Ok(0.02));
    assert_eq!(parse_float("-Infinity"), Ok(f64::NEG_INFINITY));
    assert!(parse_float("ab123cd").is_err());
    assert!(parse_float(".").is_err());
    assert!(parse_float("e5").is_err());
  }
}
