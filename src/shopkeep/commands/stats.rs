use crate::model::Product;
use crate::store::Repository;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryStats {
    pub total_products: usize,
    /// Widened so the sum of valid quantities cannot overflow.
    pub total_quantity: i128,
    pub total_value: f64,
    pub categories: BTreeMap<String, usize>,
    pub low_stock_threshold: i64,
    pub low_stock_count: usize,
    pub low_stock_products: Vec<Product>,
}

pub fn run<R: Repository>(repo: &R, low_stock_threshold: i64) -> InventoryStats {
    let products = repo.get_all();

    let mut categories: BTreeMap<String, usize> = BTreeMap::new();
    for product in &products {
        *categories.entry(product.category().to_string()).or_default() += 1;
    }

    let low_stock_products = repo.find_low_stock(low_stock_threshold);

    InventoryStats {
        total_products: products.len(),
        total_quantity: products.iter().map(|p| i128::from(p.quantity())).sum(),
        total_value: products.iter().map(Product::total_value).sum(),
        categories,
        low_stock_threshold,
        low_stock_count: low_stock_products.len(),
        low_stock_products,
    }
}
