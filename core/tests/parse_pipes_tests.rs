// tests/parse_pipes_tests.rs

mod common;

use common::*;
use pipekit::{
  default_json_value_pipe, default_value_pipe, parse_bool_pipe, parse_enum_pipe, parse_float_pipe, parse_int_pipe,
  parse_json_pipe, ParseError,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Deserialize)]
enum Choice {
  #[serde(rename = "value 1")]
  Key1,
  #[serde(rename = "value 2")]
  Key2,
  #[serde(rename = "value 3")]
  Key9,
}

#[test]
fn parse_int_accepts_leading_digits_only() {
  setup_tracing();
  let p = parse_int_pipe::<&'static str>();
  assert_eq!(ready(p.call("1234")), Ok(1234));
  assert_eq!(ready(p.call(" 12abc")), Ok(12));
  assert_eq!(ready(p.call("ab123cd")), Err(ParseError::new("integer", "ab123cd")));
}

#[test]
fn parse_float_accepts_decimal_and_scientific() {
  setup_tracing();
  let p = parse_float_pipe::<String>();
  assert_eq!(ready(p.call("1234.567".to_string())), Ok(1234.567));
  assert_eq!(ready(p.call("1.234567e3".to_string())), Ok(1234.567));
  assert!(ready(p.call("ab123cd".to_string())).is_err());
}

#[test]
fn parse_bool_is_case_sensitive() {
  setup_tracing();
  let p = parse_bool_pipe::<&'static str>();
  assert_eq!(ready(p.call("true")), Ok(true));
  assert_eq!(ready(p.call("false")), Ok(false));
  assert!(ready(p.call("True")).is_err());
  assert!(ready(p.call("ab123cd")).is_err());
  assert!(ready(p.call("")).is_err());
}

#[test]
fn parse_enum_matches_serialized_names() {
  setup_tracing();
  let p = parse_enum_pipe::<&'static str, Choice>();
  assert_eq!(ready(p.call("value 1")), Ok(Choice::Key1));
  assert_eq!(ready(p.call("value 2")), Ok(Choice::Key2));
  assert_eq!(ready(p.call("value 3")), Ok(Choice::Key9));

  // Variant identifiers are not accepted, only their serialized names.
  let err = ready(p.call("Key1")).unwrap_err();
  assert_eq!(err.input, "Key1");
  assert!(ready(p.call("value 4")).is_err());
}

#[test]
fn parse_json_reports_malformed_text() {
  setup_tracing();
  let p = parse_json_pipe::<&'static str, Value>();
  assert_eq!(ready(p.call(r#"{"key": "value"}"#)), Ok(json!({ "key": "value" })));
  assert_eq!(ready(p.call("[1, 2, 3]")), Ok(json!([1, 2, 3])));
  assert_eq!(ready(p.call("key: 999")), Err(ParseError::new("JSON", "key: 999")));

  let typed = parse_json_pipe::<&'static str, Vec<u8>>();
  assert_eq!(ready(typed.call("[1, 2, 3]")), Ok(vec![1, 2, 3]));
  assert!(ready(typed.call(r#"{"key": 1}"#)).is_err());
}

#[test]
fn default_value_only_replaces_absent_inputs() {
  setup_tracing();
  let p = default_value_pipe(1234);
  assert_eq!(ready(p.call(None)), 1234);
  assert_eq!(ready(p.call(Some(5678))), 5678);
  assert_eq!(ready(p.call(Some(0))), 0);

  let text = default_value_pipe("fallback".to_string());
  assert_eq!(ready(text.call(Some(String::new()))), "");
}

#[test]
fn default_json_value_treats_null_as_absent() {
  setup_tracing();
  let p = default_json_value_pipe(json!(1234));
  assert_eq!(ready(p.call(None)), json!(1234));
  assert_eq!(ready(p.call(Some(Value::Null))), json!(1234));
  assert_eq!(ready(p.call(Some(json!(0)))), json!(0));
  assert_eq!(ready(p.call(Some(json!(false)))), json!(false));
  assert_eq!(ready(p.call(Some(json!("")))), json!(""));
}

#[test]
fn parse_then_default_chain() {
  setup_tracing();
  let p = parse_int_pipe::<&'static str>()
    .pipe(Result::ok)
    .then(default_value_pipe(-1));
  assert_eq!(ready(p.call("17")), 17);
  assert_eq!(ready(p.call("n/a")), -1);
}
