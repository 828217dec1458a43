use super::backend::StorageBackend;
use super::record::{read_csv, write_csv, ProductRecord};
use crate::error::{Result, ShopError};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

/// In-memory storage backend for testing.
///
/// Holds the rendered CSV bytes, so reads and writes go through the same
/// codec as [`CsvBackend`](super::csv_backend::CsvBackend). `None` plays the
/// part of a file that does not exist yet.
pub struct MemBackend {
    table: RefCell<Option<Vec<u8>>>,
    simulate_write_error: Cell<bool>,
    location: PathBuf,
}

impl Default for MemBackend {
    fn default() -> Self {
        Self {
            table: RefCell::new(None),
            simulate_write_error: Cell::new(false),
            location: PathBuf::from("memory://products.csv"),
        }
    }
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `csv` as the stored table.
    pub fn with_table(csv: &str) -> Self {
        let backend = Self::default();
        *backend.table.borrow_mut() = Some(csv.as_bytes().to_vec());
        backend
    }

    /// The stored table as text, or `None` if nothing was ever written.
    pub fn table(&self) -> Option<String> {
        self.table
            .borrow()
            .as_ref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }
}

impl StorageBackend for MemBackend {
    fn read_records(&self) -> Result<Option<Vec<ProductRecord>>> {
        match self.table.borrow().as_ref() {
            Some(bytes) => read_csv(bytes.as_slice()).map(Some),
            None => Ok(None),
        }
    }

    fn write_records(&self, records: &[ProductRecord]) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(ShopError::Store("Simulated write error".to_string()));
        }
        let mut buf = Vec::new();
        write_csv(&mut buf, records)?;
        *self.table.borrow_mut() = Some(buf);
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.location
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::Product;
    use crate::store::repository::ProductRepository;
    use crate::store::Repository;

    pub struct RepoFixture {
        pub repo: ProductRepository<MemBackend>,
    }

    impl Default for RepoFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RepoFixture {
        pub fn new() -> Self {
            Self {
                repo: ProductRepository::in_memory(),
            }
        }

        pub fn with_products(mut self, count: usize) -> Self {
            for _ in 0..count {
                let id = self.repo.next_id();
                let name = format!("Test Product {}", id);
                let product = Product::new(id, name, "General", 1.0, 20, "");
                self.repo.add(product).unwrap();
            }
            self
        }

        pub fn with_product(
            mut self,
            id: &str,
            name: &str,
            category: &str,
            price: f64,
            quantity: i64,
        ) -> Self {
            let product = Product::new(id, name, category, price, quantity, "");
            self.repo.add(product).unwrap();
            self
        }

        pub fn with_supplied(mut self, id: &str, name: &str, supplier: &str) -> Self {
            let product = Product::new(id, name, "General", 1.0, 20, supplier);
            self.repo.add(product).unwrap();
            self
        }
    }
}
