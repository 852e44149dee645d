// pipekit/src/pipes/mod.rs

//! Ready-made steps: parsing, defaults and the throw boundary.

pub mod default;
pub mod parse;
pub mod throw;

pub use default::{default_json_value_pipe, default_value_pipe};
pub use parse::{
  parse_bool_pipe, parse_enum_pipe, parse_float_pipe, parse_int_pipe, parse_json_pipe, ParseError,
};
pub use throw::throw_pipe;
