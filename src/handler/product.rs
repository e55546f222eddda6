use crate::claims::Claims;
use crate::handler::ErrorResponse;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

/// Scope required to read products.
pub const PRODUCTS_READ: &str = "test-api/Products.Read";

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq)]
pub struct Product {
    pub sku: String,
    pub name: String,
    pub unit_price_cents: u64,
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Endpoints",
    security(("bearer" = ["test-api/Products.Read"])),
    responses(
        (status = OK, description = "Success", body = Vec<Product>, content_type = "application/json"),
        (status = UNAUTHORIZED, description = "Missing or invalid bearer token", body = ErrorResponse, content_type = "application/json"),
        (status = FORBIDDEN, description = "Token lacks the required scope", body = ErrorResponse, content_type = "application/json"),
    )
)]
#[instrument(skip_all, name = "Handle /api/v1/products", fields(
    faktura.subject = claims.subject().unwrap_or_default()
))]
pub async fn list_products(Extension(claims): Extension<Claims>) -> Json<Vec<Product>> {
    Json(vec![
        Product {
            sku: "P-100".to_string(),
            name: "Standard subscription".to_string(),
            unit_price_cents: 9_900,
        },
        Product {
            sku: "P-200".to_string(),
            name: "Premium subscription".to_string(),
            unit_price_cents: 24_900,
        },
    ])
}
