// pipekit/src/middleware/chain.rs

//! Middleware signatures and a runner that chains them.

use crate::core::context_data::ContextData;
use crate::error::PipeResult;
use crate::middleware::context::RequestContext;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type MiddlewareFuture = Pin<Box<dyn Future<Output = PipeResult<()>> + Send>>;

/// The rest of the chain, handed to each middleware.
pub type Next<C> = Box<dyn FnOnce(ContextData<C>) -> MiddlewareFuture + Send>;

/// A middleware: mutate the shared context, then (usually) call `next`.
///
/// Handlers are responsible for dropping lock guards on the `ContextData`
/// BEFORE any `.await`, including the await on `next`.
pub type Middleware<C> = Box<dyn Fn(ContextData<C>, Next<C>) -> MiddlewareFuture + Send + Sync>;

/// A `Next` that ends the chain successfully.
pub fn end_of_chain<C: RequestContext>() -> Next<C> {
  Box::new(|_ctx| Box::pin(async { Ok(()) }))
}

/// Wraps an async function as the final handler of a chain.
pub fn handler<C, F, Fut>(f: F) -> Next<C>
where
  C: RequestContext,
  F: FnOnce(ContextData<C>) -> Fut + Send + 'static,
  Fut: Future<Output = PipeResult<()>> + Send + 'static,
{
  Box::new(move |ctx| Box::pin(f(ctx)))
}

/// Runs `stack` in order; each middleware's `next` invokes the following
/// one, and the last one's `next` is the `next` given to the composed middleware.
pub fn compose<C: RequestContext>(stack: Vec<Middleware<C>>) -> Middleware<C> {
  let stack = Arc::new(stack);
  Box::new(move |ctx, next| dispatch(Arc::clone(&stack), 0, ctx, next))
}

fn dispatch<C: RequestContext>(
  stack: Arc<Vec<Middleware<C>>>,
  index: usize,
  ctx: ContextData<C>,
  tail: Next<C>,
) -> MiddlewareFuture {
  let Some(current) = stack.get(index) else {
    return tail(ctx);
  };
  let rest = Arc::clone(&stack);
  let next: Next<C> = Box::new(move |ctx| dispatch(rest, index + 1, ctx, tail));
  current(ctx, next)
}
