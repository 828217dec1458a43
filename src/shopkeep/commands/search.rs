use crate::model::Product;
use crate::store::Repository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Id,
    Name,
    Category,
}

/// Case-insensitive substring search over one field.
pub fn run<R: Repository>(repo: &R, field: SearchField, term: &str) -> Vec<Product> {
    match field {
        SearchField::Id => repo.search_by_id(term),
        SearchField::Name => repo.find_by_name(term),
        SearchField::Category => repo.find_by_category(term),
    }
}
