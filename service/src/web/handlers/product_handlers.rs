// service/src/web/handlers/product_handlers.rs

//! Resource handlers. They run only after the input guard let the request through,
//! so every value they read has already been validated.

use catalog_pipeline::{coerce, RequestInput};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::{AppError, Result};
use crate::models::{NewProduct, Product};
use crate::store::{ProductStore, StoreError};
use crate::web::dispatch::Reply;
use crate::web::routes::ProductOperation;

pub const PRODUCT_NOT_FOUND: &str = "Product not found";
pub const PRODUCT_DELETED: &str = "Product deleted";

pub async fn execute(operation: ProductOperation, store: &dyn ProductStore, input: &RequestInput) -> Result<Reply> {
  match operation {
    ProductOperation::List => list_products(store).await,
    ProductOperation::Get => get_product(store, path_id(input)?).await,
    ProductOperation::Create => create_product(store, input).await,
    ProductOperation::Replace => replace_product(store, path_id(input)?, input).await,
    ProductOperation::ToggleAvailability => toggle_availability(store, path_id(input)?).await,
    ProductOperation::Delete => delete_product(store, path_id(input)?).await,
  }
}

fn path_id(input: &RequestInput) -> Result<i64> {
  let raw = input.param("id").map(|v| serde_json::Value::String(v.to_string()));
  coerce::integer(raw.as_ref()).ok_or_else(|| AppError::Internal("id reached the handler unvalidated".to_string()))
}

fn validated<T>(value: Option<T>, field: &str) -> Result<T> {
  value.ok_or_else(|| AppError::Internal(format!("'{}' reached the handler unvalidated", field)))
}

fn not_found(id: i64) -> AppError {
  warn!(product_id = id, "Product not found.");
  AppError::NotFound(PRODUCT_NOT_FOUND.to_string())
}

async fn load(store: &dyn ProductStore, id: i64) -> Result<Product> {
  store.find(id).await?.ok_or_else(|| not_found(id))
}

#[instrument(name = "handler::list_products", skip(store))]
async fn list_products(store: &dyn ProductStore) -> Result<Reply> {
  let products = store.list().await?;
  info!("Fetched {} products.", products.len());
  Ok(Reply::ok(json!({ "data": products })))
}

#[instrument(name = "handler::get_product", skip(store))]
async fn get_product(store: &dyn ProductStore, id: i64) -> Result<Reply> {
  let product = load(store, id).await?;
  Ok(Reply::ok(json!({ "data": product })))
}

#[instrument(name = "handler::create_product", skip(store, input))]
async fn create_product(store: &dyn ProductStore, input: &RequestInput) -> Result<Reply> {
  let name = validated(coerce::text(input.body_field("name")), "name")?;
  let price = validated(coerce::number(input.body_field("price")), "price")?;

  let product = store.create(NewProduct::new(name, price)).await?;
  info!(product_id = product.id, "Product created.");
  Ok(Reply::created(json!({ "data": product })))
}

#[instrument(name = "handler::replace_product", skip(store, input))]
async fn replace_product(store: &dyn ProductStore, id: i64, input: &RequestInput) -> Result<Reply> {
  let mut product = load(store, id).await?;
  let name = validated(coerce::text(input.body_field("name")), "name")?;
  let price = validated(coerce::number(input.body_field("price")), "price")?;
  let availability = validated(coerce::boolean(input.body_field("availability")), "availability")?;

  product.replace(name, price, availability);
  let product = persist(store, &product).await?;
  Ok(Reply::ok(json!({ "data": product })))
}

#[instrument(name = "handler::toggle_availability", skip(store))]
async fn toggle_availability(store: &dyn ProductStore, id: i64) -> Result<Reply> {
  let product = match store.toggle_availability(id).await {
    Ok(product) => product,
    Err(StoreError::Missing(id)) => return Err(not_found(id)),
    Err(e) => return Err(e.into()),
  };
  info!(availability = product.availability, "Product availability updated.");
  Ok(Reply::ok(json!({ "data": product })))
}

#[instrument(name = "handler::delete_product", skip(store))]
async fn delete_product(store: &dyn ProductStore, id: i64) -> Result<Reply> {
  match store.delete(id).await {
    Ok(()) => {
      info!("Product deleted.");
      Ok(Reply::ok(json!({ "data": PRODUCT_DELETED })))
    }
    Err(StoreError::Missing(id)) => Err(not_found(id)),
    Err(e) => Err(e.into()),
  }
}

/// A row deleted between `load` and the write is reported as not found.
async fn persist(store: &dyn ProductStore, product: &Product) -> Result<Product> {
  match store.update(product).await {
    Ok(updated) => Ok(updated),
    Err(StoreError::Missing(id)) => Err(not_found(id)),
    Err(e) => Err(e.into()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::{MemoryProductStore, StoreResult};
  use async_trait::async_trait;
  use serde_json::json;
  use std::sync::atomic::{AtomicBool, Ordering};

  /// Commits a full replace of product 1 right after the first read of it,
  /// the way a PUT racing with the request under test would.
  struct RacingReplaceStore {
    inner: MemoryProductStore,
    replaced: AtomicBool,
  }

  impl RacingReplaceStore {
    async fn replace_once(&self) {
      if !self.replaced.swap(true, Ordering::SeqCst) {
        let mut product = self.inner.find(1).await.unwrap().unwrap();
        product.replace("Renamed".to_string(), 999.0, true);
        self.inner.update(&product).await.unwrap();
      }
    }
  }

  #[async_trait]
  impl ProductStore for RacingReplaceStore {
    async fn authenticate(&self) -> StoreResult<()> {
      self.inner.authenticate().await
    }

    async fn sync_schema(&self) -> StoreResult<()> {
      self.inner.sync_schema().await
    }

    async fn list(&self) -> StoreResult<Vec<Product>> {
      self.inner.list().await
    }

    async fn find(&self, id: i64) -> StoreResult<Option<Product>> {
      let snapshot = self.inner.find(id).await;
      self.replace_once().await;
      snapshot
    }

    async fn create(&self, product: NewProduct) -> StoreResult<Product> {
      self.inner.create(product).await
    }

    async fn update(&self, product: &Product) -> StoreResult<Product> {
      self.inner.update(product).await
    }

    async fn toggle_availability(&self, id: i64) -> StoreResult<Product> {
      self.replace_once().await;
      self.inner.toggle_availability(id).await
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
      self.inner.delete(id).await
    }
  }

  fn body(value: serde_json::Value) -> RequestInput {
    RequestInput::new().with_body(value)
  }

  #[tokio::test]
  async fn create_defaults_availability_and_accepts_numeric_strings() {
    let store = MemoryProductStore::new();
    let reply = execute(
      ProductOperation::Create,
      &store,
      &body(json!({"name": "Casita", "price": "300"})),
    )
    .await
    .unwrap();
    assert_eq!(reply.status.as_u16(), 201);
    assert_eq!(
      reply.body,
      json!({"data": {"id": 1, "name": "Casita", "price": 300.0, "availability": true}})
    );
  }

  #[tokio::test]
  async fn toggle_twice_restores_availability() {
    let store = MemoryProductStore::new();
    store.create(NewProduct::new("Casita", 300.0)).await.unwrap();
    let input = RequestInput::new().with_param("id", "1");

    let first = execute(ProductOperation::ToggleAvailability, &store, &input).await.unwrap();
    assert_eq!(first.body["data"]["availability"], json!(false));
    let second = execute(ProductOperation::ToggleAvailability, &store, &input).await.unwrap();
    assert_eq!(second.body["data"]["availability"], json!(true));
    assert_eq!(second.body["data"]["name"], json!("Casita"));
  }

  #[tokio::test]
  async fn toggle_keeps_a_concurrent_replace() {
    let store = RacingReplaceStore {
      inner: MemoryProductStore::new(),
      replaced: AtomicBool::new(false),
    };
    store.create(NewProduct::new("Casita", 300.0)).await.unwrap();
    let input = RequestInput::new().with_param("id", "1");

    let reply = execute(ProductOperation::ToggleAvailability, &store, &input).await.unwrap();
    assert_eq!(
      reply.body,
      json!({"data": {"id": 1, "name": "Renamed", "price": 999.0, "availability": false}})
    );
    assert_eq!(store.inner.find(1).await.unwrap().unwrap().name, "Renamed");
  }

  #[tokio::test]
  async fn missing_product_is_not_found() {
    let store = MemoryProductStore::new();
    let input = RequestInput::new().with_param("id", "7");
    for op in [ProductOperation::Get, ProductOperation::ToggleAvailability, ProductOperation::Delete] {
      let err = execute(op, &store, &input).await.unwrap_err();
      assert!(matches!(err, AppError::NotFound(ref m) if m == PRODUCT_NOT_FOUND), "{op:?}");
    }
  }

  #[tokio::test]
  async fn store_failures_surface_as_store_errors() {
    let store = MemoryProductStore::unreachable();
    let err = execute(ProductOperation::List, &store, &RequestInput::new()).await.unwrap_err();
    assert!(matches!(err, AppError::Store(StoreError::Unavailable(_))));
  }
}
