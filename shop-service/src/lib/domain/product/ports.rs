use async_trait::async_trait;

use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::product::errors::ProductError;

/// Port for product domain service operations.
#[async_trait]
pub trait ProductServicePort: Send + Sync + 'static {
    /// List the whole catalogue.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_products(&self) -> Result<Vec<Product>, ProductError>;

    /// Retrieve a product by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_product(&self, id: &ProductId) -> Result<Product, ProductError>;

    /// Add a product to the catalogue.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_product(&self, command: CreateProductCommand)
        -> Result<Product, ProductError>;
}

/// Persistence operations for products.
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    async fn list_all(&self) -> Result<Vec<Product>, ProductError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError>;

    /// Persist a new product; the store assigns the identifier and timestamp.
    async fn create(&self, command: CreateProductCommand) -> Result<Product, ProductError>;
}
