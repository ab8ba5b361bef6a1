// service/src/models/product.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
  pub id: i64,
  pub name: String,
  pub price: f64,
  pub availability: bool,
}

impl Product {
  /// Full replace of the mutable fields. `id` never changes.
  pub fn replace(&mut self, name: String, price: f64, availability: bool) {
    self.name = name;
    self.price = price;
    self.availability = availability;
  }

  pub fn toggle_availability(&mut self) {
    self.availability = !self.availability;
  }
}

/// A product not yet persisted; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
  pub name: String,
  pub price: f64,
  pub availability: bool,
}

impl NewProduct {
  /// New products start out available.
  pub fn new(name: impl Into<String>, price: f64) -> Self {
    Self {
      name: name.into(),
      price,
      availability: true,
    }
  }
}
