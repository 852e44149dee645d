// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use pipekit::{ClassSchema, Constraint, Field, FieldType, Flow, PipeResult};
use pipekit::validation::schema::{boolean, number, object, string, ObjectSchema};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;

// --- Common Fixtures ---
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct User {
  pub name: String,
  pub age: u32,
  pub status: bool,
}

impl ClassSchema for User {
  fn fields() -> Vec<Field> {
    vec![
      Field::new("name", FieldType::String).rule(Constraint::IsString),
      Field::new("age", FieldType::Number).rule(Constraint::IsNumber),
      Field::new("status", FieldType::Boolean).rule(Constraint::IsBoolean),
    ]
  }
}

/// `name: string, age: number, status: boolean`, unknown keys stripped.
pub fn user_schema() -> ObjectSchema {
  object()
    .field("name", string())
    .field("age", number())
    .field("status", boolean())
}

pub fn valid_user() -> Value {
  json!({ "name": "Vlad", "age": 22, "status": true })
}

pub fn invalid_user() -> Value {
  json!({ "name": 5140, "age": "22", "status": "true" })
}

pub fn user_with_extra_field() -> Value {
  json!({ "name": "Vlad", "age": 22, "status": true, "someField": "value" })
}

pub fn user_missing_age() -> Value {
  json!({ "name": "Vlad", "status": true })
}

// --- Flow helpers ---

/// Unwraps a flow that must be synchronous and must not raise.
pub fn ready<T: Send + 'static>(flow: Flow<PipeResult<T>>) -> T {
  assert!(flow.is_ready(), "expected a synchronous result");
  flow
    .now()
    .expect("flow should be ready")
    .expect("pipeline should not raise")
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Atomic counters for checking execution counts ---
pub static STEP_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));
pub static HANDLER_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  STEP_EXEC_COUNTER.store(0, Ordering::SeqCst);
  HANDLER_EXEC_COUNTER.store(0, Ordering::SeqCst);
}
