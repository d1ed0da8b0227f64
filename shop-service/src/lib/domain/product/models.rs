use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::product::errors::ProductIdError;
use crate::product::errors::ProductValidationError;

/// Product catalogue entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Product unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductId(pub i64);

impl ProductId {
    /// Parse a product ID from a path segment.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a positive integer
    pub fn from_string(s: &str) -> Result<Self, ProductIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(ProductId(id)),
            Ok(id) => Err(ProductIdError::InvalidFormat(format!(
                "{} is not positive",
                id
            ))),
            Err(e) => Err(ProductIdError::InvalidFormat(e.to_string())),
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to add a product to the catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProductCommand {
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub quantity: i32,
}

impl CreateProductCommand {
    const MAX_NAME_LENGTH: usize = 255;

    /// Construct a validated create product command.
    ///
    /// # Errors
    /// * `EmptyName` - Name is blank
    /// * `NameTooLong` - Name longer than 255 characters
    /// * `InvalidPrice` - Price is not a finite positive number
    /// * `NegativeQuantity` - Quantity below zero
    pub fn new(
        name: String,
        description: String,
        image: String,
        price: f64,
        quantity: i32,
    ) -> Result<Self, ProductValidationError> {
        let name = name.trim().to_string();
        let length = name.chars().count();
        if length == 0 {
            return Err(ProductValidationError::EmptyName);
        }
        if length > Self::MAX_NAME_LENGTH {
            return Err(ProductValidationError::NameTooLong {
                max: Self::MAX_NAME_LENGTH,
                actual: length,
            });
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(ProductValidationError::InvalidPrice(price));
        }
        if quantity < 0 {
            return Err(ProductValidationError::NegativeQuantity(quantity));
        }

        Ok(Self {
            name,
            description,
            image,
            price,
            quantity,
        })
    }
}
