// tests/common/mod.rs
#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::http::Method;
use actix_web::test::TestRequest;
use actix_web::{App, Error};
use catalog_api::config::{AppConfig, LogFormat};
use catalog_api::store::{MemoryProductStore, ProductStore};
use catalog_api::web::cors::CorsPolicy;
use catalog_api::{build_app, AppRoutes, AppState};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

pub const FRONTEND: &str = "http://localhost:5173";
pub const FOREIGN: &str = "http://evil.example";

pub fn test_config(allow_no_origin: bool) -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    database_url: "memory://".to_string(),
    db_max_connections: 1,
    cors: CorsPolicy::new(FRONTEND, allow_no_origin),
    log_format: LogFormat::Pretty,
  }
}

pub fn test_app_with(
  store: Arc<dyn ProductStore>,
  config: AppConfig,
) -> App<
  impl ServiceFactory<
    ServiceRequest,
    Config = (),
    Response = ServiceResponse<impl MessageBody>,
    Error = Error,
    InitError = (),
  >,
> {
  build_app(AppState::new(store, Arc::new(config)), Arc::new(AppRoutes::build()))
}

pub fn test_app(
  store: Arc<dyn ProductStore>,
) -> App<
  impl ServiceFactory<
    ServiceRequest,
    Config = (),
    Response = ServiceResponse<impl MessageBody>,
    Error = Error,
    InitError = (),
  >,
> {
  test_app_with(store, test_config(false))
}

pub fn new_store() -> Arc<MemoryProductStore> {
  Arc::new(MemoryProductStore::new())
}

/// A request from the configured frontend.
pub fn from_frontend(method: Method, uri: &str) -> TestRequest {
  TestRequest::default()
    .method(method)
    .uri(uri)
    .insert_header((header::ORIGIN, FRONTEND))
}

// --- Tracing Setup (once per test binary) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// Log sink for asserting on emitted events.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
  pub fn contents(&self) -> String {
    String::from_utf8_lossy(&self.0.lock()).into_owned()
  }
}

impl io::Write for CapturedLogs {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.0.lock().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
  type Writer = CapturedLogs;

  fn make_writer(&'a self) -> Self::Writer {
    self.clone()
  }
}
