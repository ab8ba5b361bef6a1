// service/src/store/mod.rs

//! Persistence of products behind the `ProductStore` trait.

pub mod memory;
pub mod postgres;

pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;

use crate::config::AppConfig;
use crate::models::{NewProduct, Product};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Store unavailable: {0}")]
  Unavailable(String),

  #[error("Product {0} not found")]
  Missing(i64),

  #[error("Constraint violated: {0}")]
  Constraint(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Async access to the products table.
///
/// `update`, `toggle_availability` and `delete` fail with `StoreError::Missing` when no row has the id.
#[async_trait]
pub trait ProductStore: Send + Sync {
  /// Verifies the store is reachable.
  async fn authenticate(&self) -> StoreResult<()>;

  /// Creates the products table when it is absent.
  async fn sync_schema(&self) -> StoreResult<()>;

  /// All products ordered by id ascending.
  async fn list(&self) -> StoreResult<Vec<Product>>;

  async fn find(&self, id: i64) -> StoreResult<Option<Product>>;

  async fn create(&self, product: NewProduct) -> StoreResult<Product>;

  async fn update(&self, product: &Product) -> StoreResult<Product>;

  /// Flips `availability` in a single write, leaving every other column as stored.
  async fn toggle_availability(&self, id: i64) -> StoreResult<Product>;

  async fn delete(&self, id: i64) -> StoreResult<()>;
}

/// Picks the store implementation named by `DATABASE_URL`.
pub fn store_from_config(config: &AppConfig) -> StoreResult<Arc<dyn ProductStore>> {
  if config.uses_memory_store() {
    tracing::info!("Using in-memory product store.");
    return Ok(Arc::new(MemoryProductStore::new()));
  }
  let store = PgProductStore::connect_lazy(&config.database_url, config.db_max_connections)?;
  Ok(Arc::new(store))
}

/// Rejects values the products table constraints would refuse.
pub(crate) fn check_constraints(name: &str, price: f64) -> StoreResult<()> {
  if name.is_empty() {
    return Err(StoreError::Constraint("name must not be empty".to_string()));
  }
  if name.chars().count() > 100 {
    return Err(StoreError::Constraint("name exceeds 100 characters".to_string()));
  }
  if price.is_nan() || price <= 0.0 {
    return Err(StoreError::Constraint("price must be greater than zero".to_string()));
  }
  Ok(())
}
