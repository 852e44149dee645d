// tests/throw_pipe_tests.rs

mod common;

use common::*;
use pipekit::{class, parse_bool_pipe, pipe, throw_pipe, validate_pipe, ClassValidatorError, ParseError, PipeError};
use serde_json::Value;

#[test]
fn ok_values_pass_through_synchronously() {
  setup_tracing();
  let p = throw_pipe::<i32, ParseError>();
  assert_eq!(ready(p.call(Ok(1234))), 1234);
}

#[test]
fn err_values_are_raised_with_their_type() {
  setup_tracing();
  let p = throw_pipe::<i32, ParseError>();
  let raised = p.call(Err(ParseError::new("integer", "abc"))).now().expect("sync").unwrap_err();

  assert!(matches!(raised, PipeError::Raised { type_name, .. } if type_name.ends_with("ParseError")));
  assert_eq!(raised.downcast_ref::<ParseError>().map(|e| e.input.as_str()), Some("abc"));
  assert!(raised.to_string().contains("cannot parse \"abc\" as integer"));
}

#[test]
fn parse_then_throw_raises_on_bad_input() {
  setup_tracing();
  let p = parse_bool_pipe::<&'static str>().then(throw_pipe());
  assert!(ready(p.call("true")));
  assert!(p.call("yes").now().expect("sync").is_err());
}

#[tokio::test]
async fn validation_errors_become_raised_after_throw() {
  setup_tracing();
  let p = pipe(|v: Value| v).then(validate_pipe(class::<User>())).then(throw_pipe());

  let user = p.call(valid_user()).await.unwrap();
  assert_eq!(user.name, "Vlad");

  let raised = p.call(invalid_user()).await.unwrap_err();
  let err = raised.downcast_ref::<ClassValidatorError>().expect("class validator error");
  assert_eq!(err.details.len(), 3);
}

#[test]
fn pipe_errors_survive_a_trip_through_anyhow() {
  setup_tracing();
  let original = PipeError::raised(ParseError::new("bool", "maybe"));
  let restored = PipeError::from(anyhow::Error::new(original));
  assert!(restored.is_raised());
  assert!(restored.downcast_ref::<ParseError>().is_some());

  let handler = PipeError::from(anyhow::anyhow!("database unavailable"));
  assert!(!handler.is_raised());
  assert!(handler.to_string().contains("database unavailable"));
}
