use crate::claims::Claims;
use crate::handler::ErrorResponse;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

/// Scope required to read invoices.
pub const INVOICE_READ: &str = "test-api/Invoice.Read";

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq)]
pub struct Invoice {
    pub id: String,
    pub customer: String,
    /// Amount in the smallest currency unit.
    pub amount_cents: u64,
    pub currency: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices",
    tag = "Endpoints",
    security(("bearer" = ["test-api/Invoice.Read"])),
    responses(
        (status = OK, description = "Success", body = Vec<Invoice>, content_type = "application/json",
            examples(
                ("Invoices" = (value = json!(vec![Invoice{
                    id: "F-1001".to_string(),
                    customer: "Kari Nordmann".to_string(),
                    amount_cents: 125_000,
                    currency: "NOK".to_string(),
                }])))
            )
        ),
        (status = UNAUTHORIZED, description = "Missing or invalid bearer token", body = ErrorResponse, content_type = "application/json"),
        (status = FORBIDDEN, description = "Token lacks the required scope", body = ErrorResponse, content_type = "application/json"),
    )
)]
#[instrument(skip_all, name = "Handle /api/v1/invoices", fields(
    faktura.subject = claims.subject().unwrap_or_default()
))]
pub async fn list_invoices(Extension(claims): Extension<Claims>) -> Json<Vec<Invoice>> {
    Json(vec![
        Invoice {
            id: "F-1001".to_string(),
            customer: "Kari Nordmann".to_string(),
            amount_cents: 125_000,
            currency: "NOK".to_string(),
        },
        Invoice {
            id: "F-1002".to_string(),
            customer: "Ola Nordmann".to_string(),
            amount_cents: 49_900,
            currency: "NOK".to_string(),
        },
    ])
}
