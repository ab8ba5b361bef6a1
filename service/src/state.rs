// service/src/state.rs
use crate::config::AppConfig;
use crate::store::ProductStore;
use std::sync::Arc;

/// Shared by every request. The store handle is created once at startup and never replaced.
#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn ProductStore>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  pub fn new(store: Arc<dyn ProductStore>, config: Arc<AppConfig>) -> Self {
    Self { store, config }
  }
}
