use super::backend::StorageBackend;
use super::csv_backend::CsvBackend;
use super::mem_backend::MemBackend;
use super::record::ProductRecord;
use super::Repository;
use crate::error::{Result, ShopError};
use crate::model::Product;
use std::path::{Path, PathBuf};

/// The authoritative product catalog, persisted through a backend.
///
/// Products are kept in insertion order; `update` replaces in place, so a
/// product keeps its position for the lifetime of the record.
pub struct ProductRepository<B: StorageBackend> {
    pub(crate) backend: B,
    products: Vec<Product>,
    is_loaded: bool,
}

pub type CsvRepository = ProductRepository<CsvBackend>;

impl ProductRepository<CsvBackend> {
    /// Binds an empty catalog to `path`. Nothing is read until `load`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_backend(CsvBackend::new(path))
    }
}

impl ProductRepository<MemBackend> {
    pub fn in_memory() -> Self {
        Self::with_backend(MemBackend::new())
    }
}

impl<B: StorageBackend> ProductRepository<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            products: Vec::new(),
            is_loaded: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.products.iter().position(|p| p.id() == id)
    }

    fn matching<F>(&self, pred: F) -> Vec<Product>
    where
        F: Fn(&Product) -> bool,
    {
        self.products.iter().filter(|p| pred(p)).cloned().collect()
    }

    fn ensure_valid(product: &Product) -> Result<()> {
        let errors = product.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ShopError::InvalidProduct(errors))
        }
    }

    /// Turns stored rows into products without touching the live catalog.
    fn products_from_records(records: Vec<ProductRecord>) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = Vec::with_capacity(records.len());
        for (i, record) in records.into_iter().enumerate() {
            let product = record.into_product();
            let errors = product.validate();
            if !errors.is_empty() {
                return Err(ShopError::MalformedRow {
                    row: i + 1,
                    message: errors.join(", "),
                });
            }

            match products.iter().position(|p| p.id() == product.id()) {
                Some(existing) => {
                    tracing::warn!(
                        id = product.id(),
                        row = i + 1,
                        "duplicate product id in stored table; later row wins"
                    );
                    products[existing] = product;
                }
                None => products.push(product),
            }
        }
        Ok(products)
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

impl<B: StorageBackend> Repository for ProductRepository<B> {
    fn get_by_id(&self, id: &str) -> Option<Product> {
        self.products.iter().find(|p| p.id() == id).cloned()
    }

    fn get_all(&self) -> Vec<Product> {
        self.products.clone()
    }

    fn add(&mut self, product: Product) -> Result<()> {
        if self.exists(product.id()) {
            return Err(ShopError::DuplicateProduct(product.id().to_string()));
        }
        Self::ensure_valid(&product)?;
        tracing::debug!(id = product.id(), "adding product");
        self.products.push(product);
        Ok(())
    }

    fn update(&mut self, product: Product) -> Result<()> {
        let idx = self
            .position(product.id())
            .ok_or_else(|| ShopError::ProductNotFound(product.id().to_string()))?;
        Self::ensure_valid(&product)?;
        tracing::debug!(id = product.id(), "updating product");
        self.products[idx] = product;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<Product> {
        let idx = self
            .position(id)
            .ok_or_else(|| ShopError::ProductNotFound(id.to_string()))?;
        tracing::debug!(id, "deleting product");
        Ok(self.products.remove(idx))
    }

    fn exists(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    fn count(&self) -> usize {
        self.products.len()
    }

    fn find_by_name(&self, pattern: &str) -> Vec<Product> {
        let pattern = pattern.to_lowercase();
        self.matching(|p| contains_ci(p.name(), &pattern))
    }

    fn find_by_category(&self, pattern: &str) -> Vec<Product> {
        let pattern = pattern.to_lowercase();
        self.matching(|p| contains_ci(p.category(), &pattern))
    }

    fn search_by_id(&self, pattern: &str) -> Vec<Product> {
        let pattern = pattern.to_lowercase();
        self.matching(|p| contains_ci(p.id(), &pattern))
    }

    fn find_low_stock(&self, threshold: i64) -> Vec<Product> {
        self.matching(|p| p.is_low_stock(threshold))
    }

    fn get_by_supplier(&self, supplier: &str) -> Vec<Product> {
        let supplier = supplier.to_lowercase();
        self.matching(|p| p.supplier().to_lowercase() == supplier)
    }

    fn next_id(&self) -> String {
        let max = self
            .products
            .iter()
            .filter_map(|p| p.id().trim().parse::<i128>().ok())
            .fold(0, i128::max);
        // Ids are at most 20 characters, far below i128::MAX.
        (max + 1).to_string()
    }

    fn load(&mut self) -> Result<()> {
        let path = self.backend.location().to_path_buf();
        let wrap = |e: ShopError| ShopError::Load {
            path: path.clone(),
            source: Box::new(e),
        };

        let products = match self.backend.read_records().map_err(wrap)? {
            Some(records) => Self::products_from_records(records).map_err(wrap)?,
            None => {
                tracing::debug!(path = %path.display(), "no stored table; starting empty");
                Vec::new()
            }
        };

        tracing::info!(count = products.len(), path = %path.display(), "loaded products");
        self.products = products;
        self.is_loaded = true;
        Ok(())
    }

    fn save(&self) -> Result<()> {
        let records: Vec<ProductRecord> = self.products.iter().map(ProductRecord::from).collect();
        self.backend
            .write_records(&records)
            .map_err(|e| ShopError::Save {
                path: self.backend.location().to_path_buf(),
                source: Box::new(e),
            })?;
        tracing::info!(
            count = records.len(),
            path = %self.backend.location().display(),
            "saved products"
        );
        Ok(())
    }

    fn clear(&mut self) {
        self.products.clear();
    }

    fn filename(&self) -> &Path {
        self.backend.location()
    }

    fn is_loaded(&self) -> bool {
        self.is_loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::fixtures::RepoFixture;

    fn product(id: &str, name: &str, category: &str, quantity: i64) -> Product {
        Product::new(id, name, category, 2.0, quantity, "")
    }

    #[test]
    fn add_then_get_by_id() {
        let mut repo = ProductRepository::in_memory();
        repo.add(product("1", "Widget", "Tools", 5)).unwrap();

        let got = repo.get_by_id("1").unwrap();
        assert_eq!(got.name(), "Widget");
        assert!(repo.exists("1"));
        assert_eq!(repo.count(), 1);
        assert!(repo.get_by_id("2").is_none());
    }

    #[test]
    fn duplicate_add_fails_and_keeps_original() {
        let mut repo = RepoFixture::new()
            .with_product("1", "Original", "Tools", 2.0, 5)
            .repo;

        let err = repo.add(product("1", "Impostor", "Tools", 1)).unwrap_err();
        assert!(matches!(err, ShopError::DuplicateProduct(id) if id == "1"));
        assert_eq!(repo.get_by_id("1").unwrap().name(), "Original");
        assert_eq!(repo.count(), 1);
    }

    #[test]
    fn add_rejects_invalid_product_with_all_errors() {
        let mut repo = ProductRepository::in_memory();
        let err = repo
            .add(Product::new("1", "", "x", -1.0, 0, ""))
            .unwrap_err();
        match err {
            ShopError::InvalidProduct(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(repo.count(), 0);
    }

    #[test]
    fn update_replaces_in_place() {
        let mut repo = RepoFixture::new().with_products(3).repo;
        let mut second = repo.get_by_id("2").unwrap();
        second.set_name("Renamed").unwrap();
        repo.update(second).unwrap();

        let names: Vec<String> = repo.get_all().iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, vec!["Test Product 1", "Renamed", "Test Product 3"]);
    }

    #[test]
    fn update_missing_fails() {
        let mut repo = ProductRepository::in_memory();
        let err = repo.update(product("9", "Ghost", "x", 1)).unwrap_err();
        assert!(matches!(err, ShopError::ProductNotFound(_)));
    }

    #[test]
    fn delete_returns_removed_product() {
        let mut repo = RepoFixture::new().with_products(2).repo;
        let removed = repo.delete("1").unwrap();
        assert_eq!(removed.id(), "1");
        assert!(!repo.exists("1"));
        assert!(matches!(
            repo.delete("1").unwrap_err(),
            ShopError::ProductNotFound(_)
        ));
    }

    #[test]
    fn next_id_scans_numeric_ids() {
        let mut repo = ProductRepository::in_memory();
        assert_eq!(repo.next_id(), "1");

        repo.add(product("3", "A", "x", 1)).unwrap();
        repo.add(product("7", "B", "x", 1)).unwrap();
        assert_eq!(repo.next_id(), "8");

        repo.add(product("abc", "C", "x", 1)).unwrap();
        assert_eq!(repo.next_id(), "8");
    }

    #[test]
    fn next_id_goes_past_i64_range() {
        let mut repo = ProductRepository::in_memory();
        repo.add(product("9223372036854775807", "A", "x", 1)).unwrap();
        assert_eq!(repo.next_id(), "9223372036854775808");

        repo.add(product("99999999999999999999", "B", "x", 1)).unwrap();
        assert_eq!(repo.next_id(), "100000000000000000000");
    }

    #[test]
    fn next_id_reuses_freed_highest_number() {
        let mut repo = RepoFixture::new().with_products(3).repo;
        assert_eq!(repo.next_id(), "4");
        repo.delete("3").unwrap();
        assert_eq!(repo.next_id(), "3");
    }

    #[test]
    fn searches_are_case_insensitive_substrings() {
        let repo = RepoFixture::new()
            .with_product("A1", "Red Widget", "Hardware", 1.0, 5)
            .with_product("B2", "Blue widget", "Garden Tools", 1.0, 50)
            .with_product("C3", "Hose", "garden", 1.0, 9)
            .repo;

        assert_eq!(repo.find_by_name("WIDGET").len(), 2);
        assert_eq!(repo.find_by_category("garden").len(), 2);
        assert_eq!(repo.search_by_id("a").len(), 1);
        assert!(repo.find_by_name("lamp").is_empty());
    }

    #[test]
    fn low_stock_uses_threshold() {
        let repo = RepoFixture::new()
            .with_product("1", "A", "x", 1.0, 9)
            .with_product("2", "B", "x", 1.0, 10)
            .with_product("3", "C", "x", 1.0, 0)
            .repo;

        let ids: Vec<String> = repo
            .find_low_stock(10)
            .iter()
            .map(|p| p.id().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(repo.find_low_stock(11).len(), 3);
    }

    #[test]
    fn supplier_match_is_exact_ignoring_case() {
        let repo = RepoFixture::new()
            .with_supplied("1", "A", "Acme")
            .with_supplied("2", "B", "ACME")
            .with_supplied("3", "C", "Acme Ltd")
            .repo;

        assert_eq!(repo.get_by_supplier("acme").len(), 2);
    }

    #[test]
    fn load_without_table_is_empty() {
        let mut repo = ProductRepository::in_memory();
        assert!(!repo.is_loaded());
        repo.load().unwrap();
        assert!(repo.is_loaded());
        assert_eq!(repo.count(), 0);
    }

    #[test]
    fn save_empty_writes_no_header() {
        let repo = ProductRepository::in_memory();
        repo.save().unwrap();
        assert_eq!(repo.backend().table(), Some(String::new()));
    }

    #[test]
    fn save_then_load_round_trips_every_field() {
        let mut repo = ProductRepository::in_memory();
        let mut p = Product::new("1", "Widget, \"XL\"", "Tools", 19.99, 3, "Acme");
        p.restore_date_added("2020-02-02 10:11:12".into());
        repo.add(p).unwrap();
        repo.add(Product::new("2", "Gadget", "", 0.1, 0, "")).unwrap();
        repo.save().unwrap();

        let table = repo.backend().table().unwrap();
        let mut reloaded = ProductRepository::with_backend(MemBackend::with_table(&table));
        reloaded.load().unwrap();

        let before = repo.get_all();
        let after = reloaded.get_all();
        assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(after.iter()) {
            assert_eq!(a.id(), b.id());
            assert_eq!(a.name(), b.name());
            assert_eq!(a.category(), b.category());
            assert_eq!(a.price(), b.price());
            assert_eq!(a.quantity(), b.quantity());
            assert_eq!(a.supplier(), b.supplier());
            assert_eq!(a.date_added(), b.date_added());
        }
        assert_eq!(after[0].date_added(), "2020-02-02 10:11:12");
    }

    #[test]
    fn failed_load_keeps_previous_catalog() {
        let table = "product_id,name,category,price,quantity,supplier,date_added\n\
                     1,Good,x,1.0,1,,\n\
                     2,Bad,x,1.0,lots,,\n";
        let mut repo = ProductRepository::with_backend(MemBackend::with_table(table));
        repo.add(product("50", "Existing", "x", 1)).unwrap();

        let err = repo.load().unwrap_err();
        assert!(matches!(err, ShopError::Load { .. }));
        assert!(err.is_storage());
        assert_eq!(repo.count(), 1);
        assert!(repo.exists("50"));
    }

    #[test]
    fn load_rejects_rows_that_break_invariants() {
        let table = "product_id,name,category,price,quantity\n1,Neg,x,-2.0,1\n";
        let mut repo = ProductRepository::with_backend(MemBackend::with_table(table));
        let err = repo.load().unwrap_err();
        match err.root() {
            ShopError::Load { source, .. } => {
                assert!(matches!(**source, ShopError::MalformedRow { row: 1, .. }))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_keeps_last_of_duplicate_rows() {
        let table = "product_id,name,category,price,quantity\n\
                     1,First,x,1.0,1\n\
                     2,Other,x,1.0,1\n\
                     1,Second,x,1.0,1\n";
        let mut repo = ProductRepository::with_backend(MemBackend::with_table(table));
        repo.load().unwrap();
        assert_eq!(repo.count(), 2);
        assert_eq!(repo.get_by_id("1").unwrap().name(), "Second");
    }

    #[test]
    fn failed_save_keeps_memory_and_retry_succeeds() {
        let mut repo = RepoFixture::new().with_products(2).repo;
        repo.backend().set_simulate_write_error(true);

        let err = repo.save().unwrap_err();
        assert!(matches!(err, ShopError::Save { .. }));
        assert_eq!(repo.count(), 2);

        repo.backend().set_simulate_write_error(false);
        repo.save().unwrap();
        repo.clear();
        repo.load().unwrap();
        assert_eq!(repo.count(), 2);
    }

    #[test]
    fn clear_resets_next_id() {
        let mut repo = RepoFixture::new().with_products(4).repo;
        repo.clear();
        assert_eq!(repo.count(), 0);
        assert_eq!(repo.next_id(), "1");
    }
}
