//! # Storage Layer
//!
//! The [`Repository`] trait is the contract the service layer works against.
//! [`repository::ProductRepository`] is its implementation: it owns the
//! authoritative in-memory catalog and hands raw I/O to a
//! [`backend::StorageBackend`].
//!
//! ## Backends
//!
//! - [`csv_backend::CsvBackend`]: production storage, one CSV file.
//! - [`mem_backend::MemBackend`]: keeps the rendered CSV in memory, for tests.
//!   Can simulate write failures.
//!
//! ## Storage Format
//!
//! ```text
//! product_id,name,category,price,quantity,supplier,date_added
//! 1,Widget,Tools,2.5,5,Acme,2026-01-02 03:04:05
//! ```
//!
//! The header is only written when there is at least one product, so saving
//! an empty catalog produces an empty file. `supplier` and `date_added` may be
//! missing from older files.
//!
//! ## Durability
//!
//! Mutations only touch memory. `save` rewrites the whole file; `CsvBackend`
//! writes to a sibling temp file and renames it into place. A failed `load`
//! leaves the catalog as it was.
//!
//! ## Identifiers
//!
//! [`Repository::next_id`] is recomputed on every call: the largest id that
//! parses as an integer, plus one. Non-numeric ids are ignored, and deleting
//! the highest id makes its number available again.

use crate::error::Result;
use crate::model::Product;
use std::path::Path;

pub mod backend;
pub mod csv_backend;
pub mod mem_backend;
pub mod record;
pub mod repository;

pub trait Repository {
    fn get_by_id(&self, id: &str) -> Option<Product>;

    /// Snapshot of all products, in insertion order.
    fn get_all(&self) -> Vec<Product>;

    /// Inserts a new product. Fails on a duplicate id or invalid data.
    fn add(&mut self, product: Product) -> Result<()>;

    /// Replaces the stored product with the same id.
    fn update(&mut self, product: Product) -> Result<()>;

    /// Removes and returns the product.
    fn delete(&mut self, id: &str) -> Result<Product>;

    fn exists(&self, id: &str) -> bool;

    fn count(&self) -> usize;

    fn find_by_name(&self, pattern: &str) -> Vec<Product>;

    fn find_by_category(&self, pattern: &str) -> Vec<Product>;

    fn search_by_id(&self, pattern: &str) -> Vec<Product>;

    fn find_low_stock(&self, threshold: i64) -> Vec<Product>;

    /// Exact, case-insensitive match on the supplier.
    fn get_by_supplier(&self, supplier: &str) -> Vec<Product>;

    fn next_id(&self) -> String;

    /// Replaces the catalog with the contents of the backing file.
    fn load(&mut self) -> Result<()>;

    /// Rewrites the backing file from the catalog.
    fn save(&self) -> Result<()>;

    fn clear(&mut self);

    fn filename(&self) -> &Path;

    fn is_loaded(&self) -> bool;
}
