use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::ports::ProductRepository;
use crate::product::errors::ProductError;

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    image: String,
    price: f64,
    quantity: i32,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId(row.id),
            name: row.name,
            description: row.description,
            image: row.image,
            price: row.price,
            quantity: row.quantity,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, ProductError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, image, price, quantity, created_at
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, image, price, quantity, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        Ok(row.map(Product::from))
    }

    async fn create(&self, command: CreateProductCommand) -> Result<Product, ProductError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, description, image, price, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, image, price, quantity, created_at
            "#,
        )
        .bind(&command.name)
        .bind(&command.description)
        .bind(&command.image)
        .bind(command.price)
        .bind(command.quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        Ok(row.into())
    }
}
