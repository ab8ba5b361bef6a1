// service/src/web/dispatch.rs

//! Runs one compiled route chain per request.

use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use catalog_pipeline::{
  route_chain, ContextData, Pipeline, PipelineControl, PipelineResult, RequestInput, ValidationScope, Verdicts,
  HANDLE_STEP,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::errors::{AppError, Result};
use crate::state::AppState;
use crate::store::ProductStore;
use crate::web::handlers::product_handlers;
use crate::web::routes::{ProductOperation, RouteDef};

/// The response a handler settled on.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
  pub status: StatusCode,
  pub body: Value,
}

impl Reply {
  pub fn ok(body: Value) -> Self {
    Self {
      status: StatusCode::OK,
      body,
    }
  }

  pub fn created(body: Value) -> Self {
    Self {
      status: StatusCode::CREATED,
      body,
    }
  }

  pub fn into_response(self) -> HttpResponse {
    HttpResponse::build(self.status).json(self.body)
  }
}

/// Request-scoped data threaded through `validate -> guard -> handle`.
pub struct RouteCtxData {
  pub store: Arc<dyn ProductStore>,
  pub input: RequestInput,
  pub verdicts: Verdicts,
  pub reply: Option<Reply>,
}

impl ValidationScope for RouteCtxData {
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

pub struct RouteEndpoint {
  operation: ProductOperation,
  reads_body: bool,
  chain: Pipeline<RouteCtxData, AppError>,
}

impl RouteEndpoint {
  /// Builds the route chain and registers the product handler on its `handle` step.
  pub fn compile(route: &RouteDef) -> Self {
    let operation = route.operation;
    let mut chain = route_chain::<RouteCtxData, AppError>(Arc::clone(&route.rules));
    chain.on_root(HANDLE_STEP, move |ctx: ContextData<RouteCtxData>| async move {
      let (store, input) = {
        let data = ctx.read();
        (Arc::clone(&data.store), data.input.clone())
      };
      let reply = product_handlers::execute(operation, store.as_ref(), &input).await?;
      ctx.write().reply = Some(reply);
      Ok::<_, AppError>(PipelineControl::Continue)
    });

    Self {
      operation,
      reads_body: route.reads_body(),
      chain,
    }
  }

  #[instrument(
    name = "dispatch",
    skip_all,
    fields(operation = ?self.operation, method = %req.method(), path = %req.path())
  )]
  pub async fn dispatch(&self, req: &HttpRequest, body: &web::Bytes, state: &AppState) -> Result<HttpResponse> {
    let mut input = RequestInput::new();
    for (name, value) in req.match_info().iter() {
      input = input.with_param(name, value);
    }
    if self.reads_body {
      input = input.with_body(parse_body(body)?);
    }

    let ctx = ContextData::new(RouteCtxData {
      store: Arc::clone(&state.store),
      input,
      verdicts: Verdicts::default(),
      reply: None,
    });

    match self.chain.run(ctx.clone()).await? {
      PipelineResult::Stopped => {
        let verdicts = std::mem::take(&mut ctx.write().verdicts);
        debug!(failures = verdicts.len(), "Route chain stopped by the input guard.");
        Err(AppError::Validation(verdicts))
      }
      PipelineResult::Completed => {
        let reply = ctx.write().reply.take();
        reply
          .map(Reply::into_response)
          .ok_or_else(|| AppError::Internal("route chain completed without a reply".to_string()))
      }
    }
  }
}

/// An empty body reads as `{}`.
fn parse_body(body: &web::Bytes) -> Result<Value> {
  if body.iter().all(u8::is_ascii_whitespace) {
    return Ok(json!({}));
  }
  serde_json::from_slice(body).map_err(|e| AppError::MalformedBody(e.to_string()))
}
