use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::list_products::ProductData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::product::models::ProductId;
use crate::inbound::http::router::AppState;
use crate::product::errors::ProductError;

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<ApiSuccess<ProductData>, ApiError> {
    let product_id = ProductId::from_string(&product_id).map_err(ProductError::from)?;

    state
        .product_service
        .get_product(&product_id)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::OK, product.into()))
}
