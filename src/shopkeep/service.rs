//! # Service Facade
//!
//! [`ProductService`] is the single entry point for the boundary layer. It
//! dispatches to the command functions, then tells observers what changed.
//!
//! ## Generic Over Repository
//!
//! `ProductService<R: Repository>` works with any repository:
//! - Production: `ProductService<CsvRepository>`
//! - Testing: `ProductService<ProductRepository<MemBackend>>`
//!
//! ## Notifications
//!
//! Events are sent only after the catalog has changed. If an observer fails,
//! the change stays in place and the error is returned to the caller.

use crate::commands::{self, export::ExportFormat, export::ExportSummary, search::SearchField};
use crate::commands::{NewProduct, UpdateReport};
use crate::config::ShopConfig;
use crate::error::Result;
use crate::events::{Observer, ObserverRegistry, ProductEvent};
use crate::model::{Product, ProductUpdate, DEFAULT_LOW_STOCK_THRESHOLD};
use crate::store::Repository;
use std::path::Path;
use std::rc::Rc;

pub use crate::commands::stats::InventoryStats;

pub struct ProductService<R: Repository> {
    repo: R,
    observers: ObserverRegistry,
    low_stock_threshold: i64,
}

impl<R: Repository> ProductService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            observers: ObserverRegistry::new(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }

    pub fn with_config(repo: R, config: &ShopConfig) -> Self {
        Self {
            low_stock_threshold: config.low_stock_threshold,
            ..Self::new(repo)
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.low_stock_threshold
    }

    // --- Observers ---

    pub fn attach_observer(&mut self, observer: Rc<dyn Observer>) -> bool {
        self.observers.attach(observer)
    }

    pub fn detach_observer(&mut self, observer: &Rc<dyn Observer>) -> bool {
        self.observers.detach(observer)
    }

    fn notify(&self, event: ProductEvent) -> Result<()> {
        tracing::debug!(event = event.kind(), id = event.product().id(), "notifying observers");
        self.observers.notify(&event)
    }

    // --- Mutations ---

    pub fn create_product(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        quantity: i64,
        supplier: impl Into<String>,
    ) -> Result<Product> {
        let new = NewProduct::new(name, category, price, quantity)
            .with_id(id)
            .with_supplier(supplier);
        self.create(new)
    }

    pub fn create_product_auto_id(
        &mut self,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        quantity: i64,
        supplier: impl Into<String>,
    ) -> Result<Product> {
        let new = NewProduct::new(name, category, price, quantity).with_supplier(supplier);
        self.create(new)
    }

    /// Creates from a [`NewProduct`]; an absent id is assigned automatically.
    pub fn create(&mut self, new: NewProduct) -> Result<Product> {
        let product = commands::create::run(&mut self.repo, new)?;
        self.notify(ProductEvent::Created(product.clone()))?;
        Ok(product)
    }

    /// Emits `product_updated` only when at least one field was applied.
    pub fn update_product(&mut self, id: &str, update: &ProductUpdate) -> Result<UpdateReport> {
        let report = commands::update::run(&mut self.repo, id, update)?;
        if report.changed() {
            self.notify(ProductEvent::Updated(report.product.clone()))?;
        }
        Ok(report)
    }

    pub fn delete_product(&mut self, id: &str) -> Result<Product> {
        let removed = commands::delete::run(&mut self.repo, id)?;
        self.notify(ProductEvent::Deleted(removed.clone()))?;
        Ok(removed)
    }

    pub fn adjust_stock(&mut self, id: &str, delta: i64) -> Result<Product> {
        let product = commands::stock::run(&mut self.repo, id, delta)?;
        self.notify(ProductEvent::StockAdjusted {
            product: product.clone(),
            delta,
        })?;
        Ok(product)
    }

    // --- Queries ---

    pub fn get_product(&self, id: &str) -> Option<Product> {
        self.repo.get_by_id(id)
    }

    pub fn get_all_products(&self) -> Vec<Product> {
        self.repo.get_all()
    }

    pub fn product_exists(&self, id: &str) -> bool {
        self.repo.exists(id)
    }

    pub fn total_count(&self) -> usize {
        self.repo.count()
    }

    pub fn search(&self, field: SearchField, term: &str) -> Vec<Product> {
        commands::search::run(&self.repo, field, term)
    }

    pub fn search_by_id(&self, term: &str) -> Vec<Product> {
        self.search(SearchField::Id, term)
    }

    pub fn search_by_name(&self, term: &str) -> Vec<Product> {
        self.search(SearchField::Name, term)
    }

    pub fn search_by_category(&self, term: &str) -> Vec<Product> {
        self.search(SearchField::Category, term)
    }

    pub fn products_by_supplier(&self, supplier: &str) -> Vec<Product> {
        self.repo.get_by_supplier(supplier)
    }

    pub fn low_stock_products(&self, threshold: i64) -> Vec<Product> {
        self.repo.find_low_stock(threshold)
    }

    pub fn get_statistics(&self) -> InventoryStats {
        commands::stats::run(&self.repo, self.low_stock_threshold)
    }

    // --- Persistence ---

    pub fn load(&mut self) -> Result<()> {
        self.repo.load()
    }

    pub fn save(&self) -> Result<()> {
        self.repo.save()
    }

    pub fn export(&self, format: ExportFormat, path: &Path) -> Result<ExportSummary> {
        commands::export::run(&self.repo.get_all(), format, path)
    }
}
