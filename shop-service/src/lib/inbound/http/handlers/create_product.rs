use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::list_products::ProductData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::product::models::CreateProductCommand;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::product::errors::ProductError;

/// Protected: only reachable through the authentication middleware.
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateProductRequest>,
) -> Result<ApiSuccess<ProductData>, ApiError> {
    let command = CreateProductCommand::new(
        body.name,
        body.description,
        body.image,
        body.price,
        body.quantity,
    )
    .map_err(ProductError::from)?;

    tracing::info!(user_id = %user.user_id, product = %command.name, "Creating product");

    state
        .product_service
        .create_product(command)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::CREATED, product.into()))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateProductRequest {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image: String,
    price: f64,
    quantity: i32,
}
