use crate::commands::NewProduct;
use crate::error::Result;
use crate::model::Product;
use crate::store::Repository;

pub fn run<R: Repository>(repo: &mut R, new: NewProduct) -> Result<Product> {
    let id = match new.id {
        Some(id) => id,
        None => repo.next_id(),
    };
    let product = Product::new(
        id,
        new.name,
        new.category,
        new.price,
        new.quantity,
        new.supplier,
    );
    repo.add(product.clone())
        .map_err(|e| e.context("create product"))?;
    Ok(product)
}
