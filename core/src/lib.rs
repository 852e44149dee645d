// src/lib.rs

//! pipekit: type-preserving pipe composition for Rust.
//!
//! pipekit builds a single callable from a chain of steps, with features like:
//!  - Synchronous and asynchronous steps behind one calling convention
//!    (`Flow::Ready` or `Flow::Pending`).
//!  - Immutable pipelines: appending returns a new pipeline sharing the old chain.
//!  - Error-as-value parsing and validation steps (`Result` outputs, never raised).
//!  - An explicit throw boundary that turns an error value into `Err`.
//!  - A validation adapter over schema-style and class-style validators.
//!  - Field-extraction middleware that stores step results in request state.

pub mod core;
pub mod error;
pub mod middleware;
pub mod pipeline;
pub mod pipes;
pub mod validation;

// --- Re-exports for the Public API ---

pub use crate::core::context_data::ContextData;
pub use crate::core::flow::Flow;
pub use crate::core::step::Step;

pub use crate::pipeline::definition::Pipeline;
pub use crate::pipeline::{pipe, pipe_async, pipe_future, pipe_step, pipe_value};

pub use crate::pipes::{
  default_json_value_pipe, default_value_pipe, parse_bool_pipe, parse_enum_pipe, parse_float_pipe, parse_int_pipe,
  parse_json_pipe, throw_pipe, ParseError,
};

pub use crate::validation::{
  class, validate_pipe, validate_pipe_with, ClassSchema, ClassValidatorError, Constraint, Field, FieldType,
  FieldViolation, Schema, SchemaError, SchemaIssue, SchemaNode, ValidateOptions, Validator,
};

pub use crate::middleware::{
  compose, end_of_chain, use_body, use_param, use_query, HttpContext, Middleware, Next, RequestContext, State,
};

pub use crate::error::{PipeError, PipeResult};

/*
    Core Workflow:
    1. Build a pipeline from a function, value, future or step: `pipe(|s: String| s.trim().to_string())`.
    2. Append steps with `.pipe(f)` (sync), `.pipe_async(f)` (async), `.then(step)` (any Step,
       including another pipeline) or `.flat_pipe(f)` (always awaits upstream first).
    3. Parse or validate with `.then(parse_int_pipe())` / `.then(validate_pipe(schema))`;
       failures arrive as `Err` *values* inside the output.
    4. Optionally end with `.then(throw_pipe())` to turn that error value into a raised `PipeError`.
    5. Call it: `pipeline.call(input)` returns a `Flow`; `.now()` for sync chains, `.await` otherwise.
*/
