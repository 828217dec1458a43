//! Field checks for raw user input.
//!
//! These run before a [`Product`](crate::model::Product) is built so the
//! boundary layer can re-prompt for a single field. They share their rules
//! with the entity setters, which still reject the same input on their own.

use crate::model::{id_problem, name_problem, price_problem};

/// Outcome of a check: whether it passed, a message for the user, and the
/// parsed value when there is one.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation<T = ()> {
    pub valid: bool,
    pub message: String,
    pub value: Option<T>,
}

impl<T> Validation<T> {
    fn ok(value: T) -> Self {
        Self {
            valid: true,
            message: String::new(),
            value: Some(value),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
            value: None,
        }
    }

    /// Converts into a `Result`, using the message as the error.
    pub fn into_result(self) -> Result<T, String> {
        match self.value {
            Some(value) if self.valid => Ok(value),
            _ => Err(self.message),
        }
    }
}

pub fn validate_product_id(id: &str) -> Validation {
    match id_problem(id) {
        Some(problem) => Validation::fail(format!("{}!", problem)),
        None => Validation::ok(()),
    }
}

pub fn validate_name(name: &str) -> Validation {
    match name_problem(name) {
        Some(problem) => Validation::fail(format!("{}!", problem)),
        None => Validation::ok(()),
    }
}

pub fn validate_price(input: &str) -> Validation<f64> {
    let Ok(price) = input.trim().parse::<f64>() else {
        return Validation::fail("Invalid price format! Please enter a number.");
    };
    match price_problem(price) {
        Some(problem) => Validation::fail(format!("{}!", problem)),
        None => Validation::ok(price),
    }
}

pub fn validate_quantity(input: &str) -> Validation<i64> {
    let Ok(quantity) = input.trim().parse::<i64>() else {
        return Validation::fail("Invalid quantity format! Please enter a whole number.");
    };
    if quantity < 0 {
        return Validation::fail("Quantity cannot be negative!");
    }
    Validation::ok(quantity)
}

/// Checks that `choice` is an integer within `min..=max`.
pub fn validate_menu_choice(choice: &str, min: i64, max: i64) -> Validation<i64> {
    let choice = choice.trim();
    if choice.is_empty() {
        return Validation::fail("Please enter a choice.");
    }
    match choice.parse::<i64>() {
        Ok(n) if (min..=max).contains(&n) => Validation::ok(n),
        Ok(_) => Validation::fail(format!(
            "Please enter a number between {} and {}.",
            min, max
        )),
        Err(_) => Validation::fail("Invalid input! Please enter a number."),
    }
}

pub fn validate_non_empty(value: &str, field_name: &str) -> Validation {
    if value.trim().is_empty() {
        return Validation::fail(format!("{} cannot be empty!", field_name));
    }
    Validation::ok(())
}
