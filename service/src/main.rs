// service/src/main.rs

use actix_web::HttpServer;
use anyhow::Context;
use std::sync::Arc;

use catalog_api::store::store_from_config;
use catalog_api::telemetry::init_tracing;
use catalog_api::{build_app, connect_db, AppConfig, AppRoutes, AppState, ConnectionOutcome};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let app_config = Arc::new(AppConfig::from_env().context("Failed to load application configuration")?);
  init_tracing(app_config.log_format);

  tracing::info!("Starting product catalog server...");

  let store = store_from_config(&app_config).context("Failed to create the product store")?;
  if connect_db(store.as_ref()).await == ConnectionOutcome::Degraded {
    tracing::warn!("Serving in degraded mode: store-bound requests will fail.");
  }

  let app_state = AppState::new(store, Arc::clone(&app_config));
  let routes = Arc::new(AppRoutes::build());

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || build_app(app_state.clone(), Arc::clone(&routes)))
    .bind(&server_address)
    .with_context(|| format!("Failed to bind {}", server_address))?
    .run()
    .await
    .context("Server terminated with an error")
}
