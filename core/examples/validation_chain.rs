// core/examples/validation_chain.rs

use catalog_pipeline::{
  coerce, route_chain, ContextData, PipelineControl, PipelineError, PipelineResult, RequestInput, RuleSet,
  ValidationScope, Verdicts, HANDLE_STEP,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

// 1. Request-scoped data: the input plus the verdicts the chain accumulates.
#[derive(Debug, Default)]
struct CreateRequest {
  input: RequestInput,
  verdicts: Verdicts,
  created: Option<String>,
}

impl ValidationScope for CreateRequest {
  fn input(&self) -> &RequestInput {
    &self.input
  }

  fn verdicts(&self) -> &Verdicts {
    &self.verdicts
  }

  fn verdicts_mut(&mut self) -> &mut Verdicts {
    &mut self.verdicts
  }
}

#[tokio::main]
async fn main() -> Result<(), PipelineError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Validation Chain Example ---");

  // 2. Declare the rules; every rule runs, failures accumulate.
  let rules = RuleSet::new()
    .body("name", |f| f.not_empty("Product name must not be empty"))
    .body("price", |f| {
      f.is_numeric("Invalid value")
        .not_empty("Product price must not be empty")
        .custom("positive", |v| coerce::number(v).map_or(false, |n| n > 0.0), "Invalid price")
    });

  // 3. validate -> guard are prewired; the handler goes on `handle`.
  let mut chain = route_chain::<CreateRequest, PipelineError>(Arc::new(rules));
  chain.on_root(HANDLE_STEP, |ctx: ContextData<CreateRequest>| async move {
    let name = coerce::text(ctx.read().input.body_field("name"));
    ctx.write().created = name;
    Ok::<_, PipelineError>(PipelineControl::Continue)
  });

  for body in [json!({"name": "Casita", "price": 300}), json!({"price": -1})] {
    let ctx = ContextData::new(CreateRequest {
      input: RequestInput::new().with_body(body.clone()),
      ..Default::default()
    });
    match chain.run(ctx.clone()).await? {
      PipelineResult::Completed => info!("{} -> created {:?}", body, ctx.read().created),
      PipelineResult::Stopped => {
        let messages: Vec<String> = ctx.read().verdicts.iter().map(|v| v.message.clone()).collect();
        info!("{} -> rejected: {:?}", body, messages);
      }
    }
  }

  Ok(())
}
