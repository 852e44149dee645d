// pipekit/examples/request_extraction.rs

use pipekit::middleware::handler;
use pipekit::validation::schema::{number, object, string};
use pipekit::{
  compose, default_json_value_pipe, use_body, use_param, use_query, validate_pipe, ContextData, HttpContext,
  PipeResult, RequestContext, SchemaError,
};
use serde_json::{json, Value};
use tracing::info;

#[tokio::main]
async fn main() -> PipeResult<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Request Extraction Example ---");

  let chain = compose(vec![
    use_param("ip").with(validate_pipe(string().ip())).into_middleware::<HttpContext>(),
    use_query("page").with(default_json_value_pipe(json!("1"))).into_middleware(),
    use_body()
      .with(validate_pipe(object().field("name", string()).field("age", number())))
      .into_middleware(),
  ]);

  let ctx = ContextData::new(
    HttpContext::new()
      .with_param("ip", "10.0.0.0")
      .with_body(json!({ "name": "Vlad", "age": 22 })),
  );

  let route = handler(|ctx: ContextData<HttpContext>| async move {
    let guard = ctx.read();
    let state = guard.state();
    let ip = state.get::<Result<Value, SchemaError>>("ip");
    let page = state.get::<Value>("page");
    let body = state.get::<Result<Value, SchemaError>>("body");
    info!("ip: {:?}", ip);
    info!("page: {:?}", page);
    info!("body: {:?}", body);
    Ok(())
  });

  chain(ctx, route).await
}
