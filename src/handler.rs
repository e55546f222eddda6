use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use utoipa::ToSchema;

mod invoice;
mod me;
mod product;
mod state;

pub use invoice::{INVOICE_READ, Invoice};
pub use me::Whoami;
pub use product::{PRODUCTS_READ, Product};
pub use state::{InitError, State};
// The __path_* functions are used by utoipa to generate OpenAPI documentation.
pub(crate) use invoice::{__path_list_invoices, list_invoices};
pub(crate) use me::{__path_whoami, whoami};
pub(crate) use product::{__path_list_products, list_products};

/// RFC 6750 error codes for bearer token usage, plus `server_error` for
/// failures that are ours rather than the caller's.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AuthErrorCode {
    InvalidToken,
    InsufficientScope,
    ServerError,
}

impl AuthErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidToken => "invalid_token",
            Self::InsufficientScope => "insufficient_scope",
            Self::ServerError => "server_error",
        }
    }
}

/// Error body attached to rejected requests.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: AuthErrorCode,
    #[serde(rename = "error_description")]
    pub description: String,
}

impl ErrorResponse {
    pub fn new(error: AuthErrorCode, description: impl Into<String>) -> Self {
        Self {
            error,
            description: description.into(),
        }
    }
}

impl Display for ErrorResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error.as_str(), self.description)
    }
}

#[test]
fn test_error_response_serialization_format() {
    use pretty_assertions::assert_eq;

    let err = ErrorResponse::new(AuthErrorCode::InsufficientScope, "missing scope");
    let serialized = serde_json::to_string(&err).unwrap();
    assert_eq!(
        serialized,
        r#"{"error":"insufficient_scope","error_description":"missing scope"}"#
    );
}
