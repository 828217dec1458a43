use crate::commands::UpdateReport;
use crate::error::{Result, ShopError};
use crate::model::ProductUpdate;
use crate::store::Repository;

/// Applies the provided fields of `update` to product `id`.
///
/// Rejected fields are reported, not fatal, as long as one field went
/// through. If every provided field is rejected nothing is written.
pub fn run<R: Repository>(repo: &mut R, id: &str, update: &ProductUpdate) -> Result<UpdateReport> {
    let mut product = repo
        .get_by_id(id)
        .ok_or_else(|| ShopError::ProductNotFound(id.to_string()))?;

    let outcome = product.apply(update);

    if outcome.applied.is_empty() && !outcome.rejected.is_empty() {
        let errors = outcome.rejected.into_iter().map(|(_, msg)| msg).collect();
        return Err(ShopError::InvalidProduct(errors).context("update product"));
    }

    if !outcome.applied.is_empty() {
        repo.update(product.clone())
            .map_err(|e| e.context("update product"))?;
    }

    Ok(UpdateReport {
        product,
        applied: outcome.applied,
        rejected: outcome.rejected,
    })
}
