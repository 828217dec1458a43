use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShopError {
    /// A single field was rejected by its setter.
    #[error("{0}")]
    InvalidField(String),

    /// Whole-entity validation failed; carries every violation found.
    #[error("Invalid product data: {}", .0.join(", "))]
    InvalidProduct(Vec<String>),

    #[error("Product with ID '{0}' already exists")]
    DuplicateProduct(String),

    #[error("Product with ID '{0}' not found")]
    ProductNotFound(String),

    #[error("Insufficient quantity: {available} in stock, adjustment of {delta}")]
    InsufficientQuantity { available: i64, delta: i64 },

    #[error("Failed to {action}: {source}")]
    Operation {
        action: &'static str,
        #[source]
        source: Box<ShopError>,
    },

    #[error("Error loading data from {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<ShopError>,
    },

    #[error("Error saving data to {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: Box<ShopError>,
    },

    #[error("Row {row}: {message}")]
    MalformedRow { row: usize, message: String },

    #[error("Observer error: {0}")]
    Observer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl ShopError {
    /// Wraps `self` with a business-level action, e.g. "create product".
    pub fn context(self, action: &'static str) -> Self {
        ShopError::Operation {
            action,
            source: Box::new(self),
        }
    }

    /// True for failures of the backing file rather than of the request.
    pub fn is_storage(&self) -> bool {
        match self {
            ShopError::Load { .. }
            | ShopError::Save { .. }
            | ShopError::MalformedRow { .. }
            | ShopError::Io(_)
            | ShopError::Csv(_)
            | ShopError::Serialization(_)
            | ShopError::Store(_) => true,
            ShopError::Operation { source, .. } => source.is_storage(),
            _ => false,
        }
    }

    /// Strips any `Operation` context and returns the underlying error.
    pub fn root(&self) -> &ShopError {
        match self {
            ShopError::Operation { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;
