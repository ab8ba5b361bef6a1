// service/src/store/memory.rs

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use tracing::instrument;

use super::{check_constraints, ProductStore, StoreError, StoreResult};
use crate::models::{NewProduct, Product};

/// Products kept in process memory, keyed by id.
///
/// Selected with `DATABASE_URL=memory://`. An unreachable store fails every
/// call with `StoreError::Unavailable`.
#[derive(Debug)]
pub struct MemoryProductStore {
  products: RwLock<BTreeMap<i64, Product>>,
  next_id: AtomicI64,
  unreachable: AtomicBool,
  operations: AtomicUsize,
}

impl Default for MemoryProductStore {
  fn default() -> Self {
    Self {
      products: RwLock::new(BTreeMap::new()),
      next_id: AtomicI64::new(1),
      unreachable: AtomicBool::new(false),
      operations: AtomicUsize::new(0),
    }
  }
}

impl MemoryProductStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn unreachable() -> Self {
    let store = Self::default();
    store.set_unreachable(true);
    store
  }

  pub fn set_unreachable(&self, unreachable: bool) {
    self.unreachable.store(unreachable, Ordering::SeqCst);
  }

  /// Number of product operations (everything but authenticate and sync) attempted so far.
  pub fn operations(&self) -> usize {
    self.operations.load(Ordering::SeqCst)
  }

  pub fn len(&self) -> usize {
    self.products.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.products.read().is_empty()
  }

  fn reachable(&self) -> StoreResult<()> {
    if self.unreachable.load(Ordering::SeqCst) {
      return Err(StoreError::Unavailable("in-memory store is unreachable".to_string()));
    }
    Ok(())
  }

  fn begin_operation(&self) -> StoreResult<()> {
    self.operations.fetch_add(1, Ordering::SeqCst);
    self.reachable()
  }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
  async fn authenticate(&self) -> StoreResult<()> {
    self.reachable()
  }

  async fn sync_schema(&self) -> StoreResult<()> {
    self.reachable()
  }

  async fn list(&self) -> StoreResult<Vec<Product>> {
    self.begin_operation()?;
    Ok(self.products.read().values().cloned().collect())
  }

  async fn find(&self, id: i64) -> StoreResult<Option<Product>> {
    self.begin_operation()?;
    Ok(self.products.read().get(&id).cloned())
  }

  #[instrument(name = "memory_store::create", skip(self, product), fields(product_name = %product.name))]
  async fn create(&self, product: NewProduct) -> StoreResult<Product> {
    self.begin_operation()?;
    check_constraints(&product.name, product.price)?;
    let id = self.next_id.fetch_add(1, Ordering::SeqCst);
    let created = Product {
      id,
      name: product.name,
      price: product.price,
      availability: product.availability,
    };
    self.products.write().insert(id, created.clone());
    Ok(created)
  }

  #[instrument(name = "memory_store::update", skip(self, product), fields(product_id = product.id))]
  async fn update(&self, product: &Product) -> StoreResult<Product> {
    self.begin_operation()?;
    check_constraints(&product.name, product.price)?;
    let mut products = self.products.write();
    let slot = products.get_mut(&product.id).ok_or(StoreError::Missing(product.id))?;
    *slot = product.clone();
    Ok(slot.clone())
  }

  #[instrument(name = "memory_store::toggle_availability", skip(self))]
  async fn toggle_availability(&self, id: i64) -> StoreResult<Product> {
    self.begin_operation()?;
    let mut products = self.products.write();
    let product = products.get_mut(&id).ok_or(StoreError::Missing(id))?;
    product.toggle_availability();
    Ok(product.clone())
  }

  #[instrument(name = "memory_store::delete", skip(self))]
  async fn delete(&self, id: i64) -> StoreResult<()> {
    self.begin_operation()?;
    self
      .products
      .write()
      .remove(&id)
      .map(|_| ())
      .ok_or(StoreError::Missing(id))
  }
}
