// pipekit/src/middleware/mod.rs

//! Field-extraction middleware, the request-facing consumers of pipelines.

pub mod chain;
pub mod context;
pub mod extract;

pub use chain::{compose, end_of_chain, handler, Middleware, MiddlewareFuture, Next};
pub use context::{HttpContext, RequestContext, State};
pub use extract::{use_body, use_param, use_query, Extractor, Source};
