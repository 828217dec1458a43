//! Business operations over a [`Repository`](crate::store::Repository).
//!
//! Each command is a free function generic over the repository, so it can be
//! tested against the in-memory backend. None of them persist: writing the
//! table is the caller's decision.

use crate::model::Product;

pub mod create;
pub mod delete;
pub mod export;
pub mod search;
pub mod stats;
pub mod stock;
pub mod update;

/// Attributes for a product that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// `None` asks the repository for the next free numeric id.
    pub id: Option<String>,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    pub supplier: String,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        quantity: i64,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: category.into(),
            price,
            quantity,
            supplier: String::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = supplier.into();
        self
    }
}

/// Result of a partial update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReport {
    pub product: Product,
    pub applied: Vec<&'static str>,
    pub rejected: Vec<(&'static str, String)>,
}

impl UpdateReport {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}
