use crate::error::{Result, ShopError};
use chrono::{DateTime, Local, Utc};
use std::hash::{Hash, Hasher};

pub const MAX_ID_LEN: usize = 20;
pub const MAX_NAME_LEN: usize = 50;
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Format of `date_added`, as written to and read from storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A shop item.
///
/// Fields are private so that every mutation goes through a validating
/// setter. The constructor itself does not validate: the repository calls
/// [`Product::validate`] before accepting a product, which lets callers see
/// every violation at once.
///
/// Equality and hashing use the id only.
#[derive(Debug, Clone)]
pub struct Product {
    id: String,
    name: String,
    category: String,
    price: f64,
    quantity: i64,
    supplier: String,
    date_added: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        quantity: i64,
        supplier: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            price,
            quantity,
            supplier: supplier.into(),
            date_added: Local::now().format(DATE_FORMAT).to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the creation stamp with the one read from storage.
    pub(crate) fn restore_date_added(&mut self, date_added: String) {
        self.date_added = date_added;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    pub fn date_added(&self) -> &str {
        &self.date_added
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if let Some(problem) = name_problem(&name) {
            return Err(ShopError::InvalidField(problem.to_string()));
        }
        self.name = name;
        self.touch();
        Ok(())
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.touch();
    }

    pub fn set_price(&mut self, price: f64) -> Result<()> {
        if let Some(problem) = price_problem(price) {
            return Err(ShopError::InvalidField(problem.to_string()));
        }
        self.price = price;
        self.touch();
        Ok(())
    }

    pub fn set_quantity(&mut self, quantity: i64) -> Result<()> {
        if quantity < 0 {
            return Err(ShopError::InvalidField(
                "Quantity cannot be negative".to_string(),
            ));
        }
        self.quantity = quantity;
        self.touch();
        Ok(())
    }

    pub fn set_supplier(&mut self, supplier: impl Into<String>) {
        self.supplier = supplier.into();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Returns every invariant violation; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Some(problem) = id_problem(&self.id) {
            errors.push(problem.to_string());
        }
        if let Some(problem) = name_problem(&self.name) {
            errors.push(problem.to_string());
        }
        if let Some(problem) = price_problem(self.price) {
            errors.push(problem.to_string());
        }
        if self.quantity < 0 {
            errors.push("Quantity cannot be negative".to_string());
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    pub fn total_value(&self) -> f64 {
        self.price * self.quantity as f64
    }

    /// Strictly below `threshold`: a quantity equal to it is not low.
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.quantity < threshold
    }

    pub fn adjust_quantity(&mut self, delta: i64) -> Result<()> {
        let new_quantity = self
            .quantity
            .checked_add(delta)
            .filter(|q| *q >= 0)
            .ok_or(ShopError::InsufficientQuantity {
                available: self.quantity,
                delta,
            })?;
        self.set_quantity(new_quantity)
    }

    /// Applies every field present in `update`, in a fixed order.
    ///
    /// A rejected field is reported and skipped; it does not undo or block
    /// the other fields.
    pub fn apply(&mut self, update: &ProductUpdate) -> AppliedUpdate {
        let mut outcome = AppliedUpdate::default();

        if let Some(name) = &update.name {
            outcome.record("name", self.set_name(name.clone()));
        }
        if let Some(category) = &update.category {
            self.set_category(category.clone());
            outcome.applied.push("category");
        }
        if let Some(price) = update.price {
            outcome.record("price", self.set_price(price));
        }
        if let Some(quantity) = update.quantity {
            outcome.record("quantity", self.set_quantity(quantity));
        }
        if let Some(supplier) = &update.supplier {
            self.set_supplier(supplier.clone());
            outcome.applied.push("supplier");
        }

        outcome
    }

    pub fn display_line(&self) -> String {
        format!(
            "ID: {} | {} | {} | ${:.2} | Qty: {} | Supplier: {}",
            self.id, self.name, self.category, self.price, self.quantity, self.supplier
        )
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

pub(crate) fn id_problem(id: &str) -> Option<&'static str> {
    if id.trim().is_empty() {
        Some("Product ID cannot be empty")
    } else if id.chars().count() > MAX_ID_LEN {
        Some("Product ID too long (max 20 characters)")
    } else {
        None
    }
}

pub(crate) fn name_problem(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        Some("Product name cannot be empty")
    } else if name.chars().count() > MAX_NAME_LEN {
        Some("Product name too long (max 50 characters)")
    } else {
        None
    }
}

pub(crate) fn price_problem(price: f64) -> Option<&'static str> {
    if !price.is_finite() {
        Some("Price must be a finite number")
    } else if price < 0.0 {
        Some("Price cannot be negative")
    } else {
        None
    }
}

/// Partial update. `None` means "not provided"; `Some` is applied even when
/// the value is empty or zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub supplier: Option<String>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.supplier.is_none()
    }
}

/// Which fields of a [`ProductUpdate`] took effect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppliedUpdate {
    pub applied: Vec<&'static str>,
    pub rejected: Vec<(&'static str, String)>,
}

impl AppliedUpdate {
    fn record(&mut self, field: &'static str, result: Result<()>) {
        match result {
            Ok(()) => self.applied.push(field),
            Err(e) => self.rejected.push((field, e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn widget() -> Product {
        Product::new("1", "Widget", "Tools", 2.5, 5, "Acme")
    }

    #[test]
    fn new_product_is_valid_and_stamped() {
        let p = widget();
        assert!(p.validate().is_empty());
        assert_eq!(p.created_at(), p.updated_at());
        assert!(NaiveDateTime::parse_from_str(p.date_added(), DATE_FORMAT).is_ok());
    }

    #[test]
    fn validate_collects_all_violations() {
        let p = Product::new("", " ", "", -1.0, -3, "");
        let errors = p.validate();
        assert_eq!(
            errors,
            vec![
                "Product ID cannot be empty",
                "Product name cannot be empty",
                "Price cannot be negative",
                "Quantity cannot be negative",
            ]
        );
    }

    #[test]
    fn validate_length_bounds() {
        let p = Product::new("x".repeat(21), "n".repeat(51), "", 0.0, 0, "");
        assert_eq!(
            p.validate(),
            vec![
                "Product ID too long (max 20 characters)",
                "Product name too long (max 50 characters)",
            ]
        );

        let p = Product::new("x".repeat(20), "n".repeat(50), "", 0.0, 0, "");
        assert!(p.is_valid());
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let p = Product::new("1", "é".repeat(50), "", 0.0, 0, "");
        assert!(p.is_valid());
    }

    #[test]
    fn set_name_rejects_blank_and_long() {
        let mut p = widget();
        assert!(p.set_name("   ").is_err());
        assert!(p.set_name("n".repeat(51)).is_err());
        assert_eq!(p.name(), "Widget");
        p.set_name("Gadget").unwrap();
        assert_eq!(p.name(), "Gadget");
    }

    #[test]
    fn set_price_rejects_negative_and_nan() {
        let mut p = widget();
        assert!(p.set_price(-0.01).is_err());
        assert!(p.set_price(f64::NAN).is_err());
        assert_eq!(p.price(), 2.5);
        p.set_price(0.0).unwrap();
        assert_eq!(p.price(), 0.0);
    }

    #[test]
    fn setters_refresh_updated_at() {
        let mut p = widget();
        let before = p.updated_at();
        std::thread::sleep(std::time::Duration::from_millis(2));
        p.set_category("Hardware");
        assert!(p.updated_at() > before);
        assert_eq!(p.created_at(), before);
    }

    #[test]
    fn low_stock_is_strict() {
        let nine = Product::new("1", "A", "", 1.0, 9, "");
        let ten = Product::new("2", "B", "", 1.0, 10, "");
        assert!(nine.is_low_stock(10));
        assert!(!ten.is_low_stock(10));
    }

    #[test]
    fn adjust_quantity_guards_negative_result() {
        let mut p = widget();
        let err = p.adjust_quantity(-6).unwrap_err();
        assert!(matches!(
            err,
            ShopError::InsufficientQuantity {
                available: 5,
                delta: -6
            }
        ));
        assert_eq!(p.quantity(), 5);

        p.adjust_quantity(-5).unwrap();
        assert_eq!(p.quantity(), 0);
    }

    #[test]
    fn total_value_is_price_times_quantity() {
        assert_eq!(widget().total_value(), 12.5);
    }

    #[test]
    fn equality_uses_id_only() {
        let a = Product::new("7", "A", "x", 1.0, 1, "");
        let b = Product::new("7", "B", "y", 2.0, 2, "z");
        let c = Product::new("8", "A", "x", 1.0, 1, "");
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: std::collections::HashSet<Product> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn apply_keeps_valid_fields_when_one_is_rejected() {
        let mut p = widget();
        let update = ProductUpdate {
            name: Some(String::new()),
            category: Some("Garden".into()),
            price: Some(-4.0),
            quantity: Some(12),
            supplier: Some(String::new()),
        };

        let outcome = p.apply(&update);
        assert_eq!(outcome.applied, vec!["category", "quantity", "supplier"]);
        assert_eq!(outcome.rejected.len(), 2);
        assert_eq!(outcome.rejected[0].0, "name");
        assert_eq!(outcome.rejected[1], ("price", "Price cannot be negative".into()));

        assert_eq!(p.name(), "Widget");
        assert_eq!(p.category(), "Garden");
        assert_eq!(p.price(), 2.5);
        assert_eq!(p.quantity(), 12);
        assert_eq!(p.supplier(), "");
    }

    #[test]
    fn apply_treats_zero_as_provided() {
        let mut p = widget();
        let outcome = p.apply(&ProductUpdate {
            price: Some(0.0),
            quantity: Some(0),
            ..Default::default()
        });
        assert_eq!(outcome.applied, vec!["price", "quantity"]);
        assert_eq!(p.price(), 0.0);
        assert_eq!(p.quantity(), 0);
    }

    #[test]
    fn display_line_formats_price() {
        assert_eq!(
            widget().display_line(),
            "ID: 1 | Widget | Tools | $2.50 | Qty: 5 | Supplier: Acme"
        );
    }
}
