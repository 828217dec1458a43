use crate::error::Result;
use crate::model::Product;
use crate::store::Repository;

pub fn run<R: Repository>(repo: &mut R, id: &str) -> Result<Product> {
    repo.delete(id).map_err(|e| e.context("delete product"))
}
