// pipekit/examples/error_handling.rs

use pipekit::validation::schema::{number, object, string};
use pipekit::{
  class, pipe, throw_pipe, validate_pipe, ClassSchema, ClassValidatorError, Constraint, Field, FieldType, SchemaError,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Signup {
  email: String,
  age: u32,
}

impl ClassSchema for Signup {
  fn fields() -> Vec<Field> {
    vec![
      Field::new("email", FieldType::String)
        .rule(Constraint::IsString)
        .rule(Constraint::Contains("@".to_string())),
      Field::new("age", FieldType::Integer)
        .rule(Constraint::IsInt)
        .rule(Constraint::Min(13.0)),
    ]
  }
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Error Handling Example ---");

  // Scenario 1: validation errors are values; the caller branches on them.
  info!("\nScenario 1: Schema validation returning an error value");
  let schema = object().field("email", string().includes("@")).field("age", number().int().min(13.0));
  let check = pipe(|v: Value| v).then(validate_pipe(schema));

  match check.call(json!({ "email": "nobody", "age": 9 })).await {
    Ok(Ok(valid)) => info!("Valid: {}", valid),
    Ok(Err(SchemaError { issues })) => {
      for issue in issues {
        warn!("Issue at {:?}: {}", issue.path, issue.message);
      }
    }
    Err(raised) => warn!("Unexpected raised error: {}", raised),
  }

  // Scenario 2: a throw boundary turns the error value into a raised error.
  info!("\nScenario 2: Class validation behind a throw boundary");
  let signup = pipe(|v: Value| v)
    .then(validate_pipe(class::<Signup>()))
    .then(throw_pipe())
    .pipe(|s: Signup| {
      info!("Creating account (should not be reached)");
      s.email
    });

  match signup.call(json!({ "email": 7, "age": "old" })).await {
    Ok(email) => info!("Account created for {}", email),
    Err(e) => {
      info!("Pipeline raised as expected: {}", e);
      if let Some(ClassValidatorError { details, .. }) = e.downcast_ref::<ClassValidatorError>() {
        for detail in details {
          warn!("{} failed: {:?}", detail.property, detail.constraints.keys().collect::<Vec<_>>());
        }
      }
    }
  }
}
