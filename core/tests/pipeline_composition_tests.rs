// tests/pipeline_composition_tests.rs

mod common;

use common::*;
use pipekit::{
  parse_int_pipe, pipe, pipe_async, pipe_future, pipe_step, pipe_value, throw_pipe, ParseError, Pipeline,
};
use pipekit::validation::schema::string;
use pipekit::validation::ValidatePipe;
use pipekit::ValidateOptions;
use serde_json::Value;
use serial_test::serial;
use std::sync::atomic::Ordering;

fn digits(n: i64) -> Vec<u32> {
  n.to_string().chars().filter_map(|c| c.to_digit(10)).collect()
}

#[test]
fn pipe_from_value_ignores_input() {
  setup_tracing();
  let p: Pipeline<(), &str> = pipe_value("value 1");
  assert_eq!(ready(p.call(())), "value 1");

  let shifted = p.pipe(|v| format!("{v} shifted"));
  assert_eq!(ready(shifted.call(())), "value 1 shifted");
}

#[test]
fn pipe_from_function_and_from_pipeline() {
  setup_tracing();
  let base = pipe(|s: &'static str| s.to_uppercase());
  let wrapped: Pipeline<&'static str, String> = pipe_step(base.clone());

  assert_eq!(ready(base.call("abc")), "ABC");
  assert_eq!(ready(wrapped.call("abc")), "ABC");
  assert!(wrapped.ptr_eq(&base));
}

#[test]
fn pipe_from_pipeline_keeps_chain_and_depth() {
  setup_tracing();
  let base = pipe(|n: i64| n + 1).pipe(|n| n * 2).pipe(|n| n - 3);
  let wrapped = pipe_step(base.clone());

  assert!(wrapped.ptr_eq(&base));
  assert_eq!(wrapped.depth(), 3);
  assert_eq!(ready(wrapped.call(4)), 7);

  // Other steps are wrapped as a one-step pipeline.
  let validator = pipe_step::<Value, _>(ValidatePipe::new(string(), ValidateOptions::default()));
  assert_eq!(validator.depth(), 1);
}

#[test]
fn sync_transformations_stay_synchronous() {
  setup_tracing();
  let p = pipe(|s: &'static str| s.trim().to_string())
    .then(parse_int_pipe())
    .then(throw_pipe())
    .pipe(|n| n * 10)
    .pipe(digits);

  assert_eq!(p.depth(), 5);
  let flow = p.call("  \t1234  \n");
  assert!(flow.is_ready());
  assert_eq!(ready(flow), vec![1, 2, 3, 4, 0]);
}

#[test]
fn appending_never_mutates_the_base_pipeline() {
  setup_tracing();
  let base = pipe(|n: u64| n + 1);
  let doubled = base.pipe(|n| n * 2);
  let squared = base.pipe(|n| n * n);

  assert_eq!(ready(base.call(3)), 4);
  assert_eq!(ready(doubled.call(3)), 8);
  assert_eq!(ready(squared.call(3)), 16);
  assert_eq!(base.depth(), 1);
  assert_eq!(doubled.depth(), 2);
  assert!(base.clone().ptr_eq(&base));
}

#[tokio::test]
async fn flat_pipe_resolves_upstream_first() {
  setup_tracing();
  let p = pipe_async(|s: String| async move { s })
    .flat_pipe(|s| s.trim().to_string())
    .flat_pipe(|s| s.parse::<i64>().unwrap_or_default())
    .flat_pipe(|n| n * 10);

  assert_eq!(p.call(" \t1234 \t".to_string()).await.unwrap(), 12340);
}

#[tokio::test]
async fn flat_pipe_is_pending_even_over_sync_steps() {
  setup_tracing();
  let p = pipe(|n: i32| n + 1).flat_pipe(|n| n * 2);
  let flow = p.call(1);
  assert!(flow.is_pending());
  assert_eq!(flow.await.unwrap(), 4);
}

#[tokio::test]
#[serial]
async fn steps_after_a_pending_value_wait_for_await() {
  setup_tracing();
  reset_counters();
  let p = pipe_future::<(), _>(async { "value 1".to_string() }).pipe(|v| {
    STEP_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{v} -> value 2")
  });

  let flow = p.call(());
  assert!(flow.is_pending());
  assert_eq!(STEP_EXEC_COUNTER.load(Ordering::SeqCst), 0);

  assert_eq!(flow.await.unwrap(), "value 1 -> value 2");
  assert_eq!(STEP_EXEC_COUNTER.load(Ordering::SeqCst), 1);

  // The deferred source is shared between calls.
  assert_eq!(p.call(()).await.unwrap(), "value 1 -> value 2");
  assert_eq!(STEP_EXEC_COUNTER.load(Ordering::SeqCst), 2);
}

#[tokio::test]
#[serial]
async fn sync_steps_before_an_async_step_run_on_call() {
  setup_tracing();
  reset_counters();
  let p = pipe(|n: i32| {
    STEP_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
    n + 1
  })
  .pipe_async(|n| async move { n * 2 });

  let flow = p.call(5);
  assert!(flow.is_pending());
  assert_eq!(STEP_EXEC_COUNTER.load(Ordering::SeqCst), 1);
  assert_eq!(flow.await.unwrap(), 12);
}

#[tokio::test]
async fn nested_pipelines_compose_as_steps() {
  setup_tracing();
  let inner = pipe(|n: i64| n * 10).pipe(|n| n + 1);
  let outer = pipe(|s: &'static str| s.len() as i64).then(inner.clone()).pipe(|n| n.to_string());
  assert_eq!(inner.depth(), 2);
  assert_eq!(outer.depth(), 4);
  assert!(outer.call("abc").is_ready());
  assert_eq!(ready(outer.call("abc")), "31");

  let async_inner = pipe_async(|n: i64| async move { n - 1 });
  let mixed = outer.pipe(|s| s.parse::<i64>().unwrap_or_default()).then(async_inner);
  let flow = mixed.call("abc");
  assert!(flow.is_pending());
  assert_eq!(flow.await.unwrap(), 30);
}

#[test]
#[serial]
fn raised_errors_skip_later_steps() {
  setup_tracing();
  reset_counters();
  let p = pipe(|s: &'static str| s)
    .then(parse_int_pipe())
    .then(throw_pipe())
    .pipe(|n| {
      STEP_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
      n + 1
    });

  let raised = p.call("nope").now().expect("sync chain").unwrap_err();
  assert!(raised.is_raised());
  assert_eq!(raised.downcast_ref::<ParseError>(), Some(&ParseError::new("integer", "nope")));
  assert_eq!(STEP_EXEC_COUNTER.load(Ordering::SeqCst), 0);

  assert_eq!(ready(p.call("41")), 42);
  assert_eq!(STEP_EXEC_COUNTER.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn raised_errors_cross_async_steps() {
  setup_tracing();
  let p = pipe_async(|s: String| async move { s })
    .then(parse_int_pipe())
    .then(throw_pipe())
    .pipe_async(|n| async move { n * 2 });

  let raised = p.call("x1".to_string()).await.unwrap_err();
  assert!(raised.downcast_ref::<ParseError>().is_some());
  assert_eq!(p.call("21".to_string()).await.unwrap(), 42);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn pipelines_are_shared_across_tasks() {
  setup_tracing();
  let base = pipe_async(|n: u64| async move { n + 1 });
  let handles: Vec<_> = (0..8u64)
    .map(|i| {
      let p = base.pipe(move |n| n * i);
      tokio::spawn(async move { p.call(1).await })
    })
    .collect();

  for (i, handle) in handles.into_iter().enumerate() {
    assert_eq!(handle.await.unwrap().unwrap(), 2 * i as u64);
  }
}
