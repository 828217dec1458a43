use crate::error::{Result, ShopError};
use crate::model::Product;
use crate::store::Repository;

/// Adds `delta` (which may be negative) to the stock of product `id`.
pub fn run<R: Repository>(repo: &mut R, id: &str, delta: i64) -> Result<Product> {
    let mut product = repo
        .get_by_id(id)
        .ok_or_else(|| ShopError::ProductNotFound(id.to_string()))?;

    product
        .adjust_quantity(delta)
        .map_err(|e| e.context("adjust stock"))?;
    repo.update(product.clone())
        .map_err(|e| e.context("adjust stock"))?;
    Ok(product)
}
