use thiserror::Error;

/// Error for ProductId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProductIdError {
    #[error("Invalid product ID format: {0}")]
    InvalidFormat(String),
}

/// Error for new product validation failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductValidationError {
    #[error("Product name must not be empty")]
    EmptyName,

    #[error("Product name too long: maximum {max} characters, got {actual}")]
    NameTooLong { max: usize, actual: usize },

    #[error("Price must be a positive number, got {0}")]
    InvalidPrice(f64),

    #[error("Quantity must not be negative, got {0}")]
    NegativeQuantity(i32),
}

/// Top-level error for all product-related operations
#[derive(Debug, Clone, Error)]
pub enum ProductError {
    #[error("Invalid product ID: {0}")]
    InvalidProductId(#[from] ProductIdError),

    #[error("Invalid product: {0}")]
    Invalid(#[from] ProductValidationError),

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
