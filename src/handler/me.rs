use crate::claims::Claims;
use crate::handler::ErrorResponse;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

/// The caller's identity as the authentication stage resolved it.
/// Useful for verifying the token wiring end to end.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq)]
pub struct Whoami {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub scopes: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/me",
    tag = "Endpoints",
    security(("bearer" = [])),
    responses(
        (status = OK, description = "Success", body = Whoami, content_type = "application/json",
            examples(
                ("Whoami" = (value = json!(Whoami{
                    subject: Some("e015542c-0f81-40f5-bbd9-7c3d9366298f".to_string()),
                    scopes: vec!["test-api/Invoice.Read".to_string()],
                })))
            )
        ),
        (status = UNAUTHORIZED, description = "Missing or invalid bearer token", body = ErrorResponse, content_type = "application/json"),
    )
)]
#[instrument(skip_all, name = "Handle /api/v1/me")]
pub async fn whoami(Extension(claims): Extension<Claims>) -> Json<Whoami> {
    Json(Whoami {
        subject: claims.subject().map(ToString::to_string),
        scopes: claims.scopes().into_iter().map(ToString::to_string).collect(),
    })
}
