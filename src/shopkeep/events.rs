//! Change notifications emitted by the service.
//!
//! Observers are called synchronously, in the order they were attached, after
//! the change has been applied to the catalog. An observer error is returned
//! to whoever called the service method.

use crate::error::Result;
use crate::model::Product;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum ProductEvent {
    Created(Product),
    Updated(Product),
    Deleted(Product),
    StockAdjusted { product: Product, delta: i64 },
}

impl ProductEvent {
    /// Event-type tag.
    pub fn kind(&self) -> &'static str {
        match self {
            ProductEvent::Created(_) => "product_created",
            ProductEvent::Updated(_) => "product_updated",
            ProductEvent::Deleted(_) => "product_deleted",
            ProductEvent::StockAdjusted { .. } => "stock_adjusted",
        }
    }

    pub fn product(&self) -> &Product {
        match self {
            ProductEvent::Created(p)
            | ProductEvent::Updated(p)
            | ProductEvent::Deleted(p)
            | ProductEvent::StockAdjusted { product: p, .. } => p,
        }
    }
}

pub trait Observer {
    fn update(&self, event: &ProductEvent) -> Result<()>;
}

/// Ordered set of observers; an observer is present at most once.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Rc<dyn Observer>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `observer` was already attached.
    pub fn attach(&mut self, observer: Rc<dyn Observer>) -> bool {
        if self.contains(&observer) {
            return false;
        }
        self.observers.push(observer);
        true
    }

    /// Returns false if `observer` was not attached.
    pub fn detach(&mut self, observer: &Rc<dyn Observer>) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| !same_observer(o, observer));
        self.observers.len() != before
    }

    pub fn contains(&self, observer: &Rc<dyn Observer>) -> bool {
        self.observers.iter().any(|o| same_observer(o, observer))
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Stops at the first failing observer.
    pub fn notify(&self, event: &ProductEvent) -> Result<()> {
        for observer in &self.observers {
            observer.update(event)?;
        }
        Ok(())
    }
}

// Compare data pointers only; vtable pointers can differ across codegen units.
fn same_observer(a: &Rc<dyn Observer>, b: &Rc<dyn Observer>) -> bool {
    std::ptr::eq(
        Rc::as_ptr(a) as *const (),
        Rc::as_ptr(b) as *const (),
    )
}

/// Forwards every event to `tracing`.
#[derive(Debug, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn update(&self, event: &ProductEvent) -> Result<()> {
        match event {
            ProductEvent::StockAdjusted { product, delta } => tracing::info!(
                event = event.kind(),
                id = product.id(),
                delta,
                quantity = product.quantity(),
                "stock adjusted"
            ),
            _ => tracing::info!(
                event = event.kind(),
                id = event.product().id(),
                name = event.product().name(),
                "product changed"
            ),
        }
        Ok(())
    }
}
