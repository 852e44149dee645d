// pipekit/examples/basic_pipeline.rs

use pipekit::{parse_int_pipe, pipe, pipe_async, throw_pipe, PipeResult};
use tracing::info;

#[tokio::main]
async fn main() -> PipeResult<()> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Pipeline Example ---");

  // 1. A synchronous chain: every step runs inside `call`, no executor needed.
  let normalize = pipe(|s: String| s.trim().to_string());
  let to_digits = normalize
    .then(parse_int_pipe())
    .then(throw_pipe())
    .pipe(|n| n * 10)
    .pipe(|n| n.to_string().chars().filter_map(|c| c.to_digit(10)).collect::<Vec<_>>());

  let flow = to_digits.call("  1234  ".to_string());
  info!("Sync chain ready immediately: {}", flow.is_ready());
  info!("Digits: {:?}", flow.await?);

  // 2. The base pipeline is untouched and can be extended in another direction.
  let shouted = normalize.pipe(|s| s.to_uppercase());
  info!("Shouted: {}", shouted.call("  hello ".to_string()).await?);

  // 3. An async step makes the rest of the chain pending.
  let slow_double = pipe_async(|n: u64| async move {
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    n * 2
  })
  .pipe(|n| n + 1);

  let flow = slow_double.call(20);
  info!("Async chain pending: {}", flow.is_pending());
  info!("Result after await: {}", flow.await?);

  info!("Depths: to_digits={}, slow_double={}", to_digits.depth(), slow_double.depth());
  Ok(())
}
