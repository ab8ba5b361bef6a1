// service/src/store/postgres.rs

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use tracing::{error, instrument};

use super::{ProductStore, StoreError, StoreResult};
use crate::models::{NewProduct, Product};

const CREATE_PRODUCTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS products (
  id BIGSERIAL PRIMARY KEY,
  name VARCHAR(100) NOT NULL CHECK (name <> ''),
  price DOUBLE PRECISION NOT NULL CHECK (price > 0),
  availability BOOLEAN NOT NULL DEFAULT TRUE
)";

pub struct PgProductStore {
  pool: PgPool,
}

impl PgProductStore {
  /// Builds the pool without opening a connection; the first query connects.
  pub fn connect_lazy(database_url: &str, max_connections: u32) -> StoreResult<Self> {
    let options = PgConnectOptions::from_str(database_url)?;
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect_lazy_with(options);
    Ok(Self { pool })
  }
}

fn log_db_error(operation: &str) -> impl FnOnce(sqlx::Error) -> StoreError + '_ {
  move |e| {
    error!(operation = operation, error = %e, "Database query failed.");
    StoreError::Database(e)
  }
}

#[async_trait]
impl ProductStore for PgProductStore {
  #[instrument(name = "store::authenticate", skip(self))]
  async fn authenticate(&self) -> StoreResult<()> {
    sqlx::query("SELECT 1").execute(&self.pool).await?;
    Ok(())
  }

  #[instrument(name = "store::sync_schema", skip(self))]
  async fn sync_schema(&self) -> StoreResult<()> {
    sqlx::query(CREATE_PRODUCTS_TABLE).execute(&self.pool).await?;
    Ok(())
  }

  #[instrument(name = "store::list", skip(self))]
  async fn list(&self) -> StoreResult<Vec<Product>> {
    sqlx::query_as("SELECT id, name, price, availability FROM products ORDER BY id ASC")
      .fetch_all(&self.pool)
      .await
      .map_err(log_db_error("list"))
  }

  #[instrument(name = "store::find", skip(self))]
  async fn find(&self, id: i64) -> StoreResult<Option<Product>> {
    sqlx::query_as("SELECT id, name, price, availability FROM products WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(log_db_error("find"))
  }

  #[instrument(name = "store::create", skip(self, product), fields(product_name = %product.name))]
  async fn create(&self, product: NewProduct) -> StoreResult<Product> {
    sqlx::query_as(
      "INSERT INTO products (name, price, availability) VALUES ($1, $2, $3) RETURNING id, name, price, availability",
    )
    .bind(&product.name)
    .bind(product.price)
    .bind(product.availability)
    .fetch_one(&self.pool)
    .await
    .map_err(log_db_error("create"))
  }

  #[instrument(name = "store::update", skip(self, product), fields(product_id = product.id))]
  async fn update(&self, product: &Product) -> StoreResult<Product> {
    let updated: Option<Product> = sqlx::query_as(
      "UPDATE products SET name = $2, price = $3, availability = $4 WHERE id = $1 RETURNING id, name, price, availability",
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(product.price)
    .bind(product.availability)
    .fetch_optional(&self.pool)
    .await
    .map_err(log_db_error("update"))?;
    updated.ok_or(StoreError::Missing(product.id))
  }

  #[instrument(name = "store::toggle_availability", skip(self))]
  async fn toggle_availability(&self, id: i64) -> StoreResult<Product> {
    let toggled: Option<Product> = sqlx::query_as(
      "UPDATE products SET availability = NOT availability WHERE id = $1 RETURNING id, name, price, availability",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await
    .map_err(log_db_error("toggle_availability"))?;
    toggled.ok_or(StoreError::Missing(id))
  }

  #[instrument(name = "store::delete", skip(self))]
  async fn delete(&self, id: i64) -> StoreResult<()> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(log_db_error("delete"))?;
    if result.rows_affected() == 0 {
      return Err(StoreError::Missing(id));
    }
    Ok(())
  }
}
