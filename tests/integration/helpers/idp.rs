use crate::helpers::jwt::SIGNING_KEY;
use axum::Json;
use axum::Router;
use axum::routing::get;
use serde_json::{Value, json};
use std::net::SocketAddr;
use tokio::task::JoinHandle;

/// In-process stand-in for the identity provider's metadata surface.
/// Serves the JWKS that matches the test signing key; the authorization and
/// token endpoints only need to exist as URLs for the documentation tests.
pub struct MockIdp {
    address: SocketAddr,
    handle: JoinHandle<()>,
}

impl MockIdp {
    pub async fn start() -> Self {
        // Serve only the public portion of the key, as a real provider would.
        // Private fields in the JWKS make `jsonwebkey`'s `to_decoding_key`
        // emit a private-key PEM, which fails signature verification.
        let mut key = serde_json::from_str::<Value>(SIGNING_KEY).unwrap();
        for private_field in ["p", "q", "d", "qi", "dp", "dq"] {
            key.as_object_mut().unwrap().remove(private_field);
        }
        let jwks: Value = json!({ "keys": [key] });
        let router = Router::new().route(
            "/entra/jwks",
            get(move || {
                let jwks = jwks.clone();
                async move { Json(jwks) }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { address, handle }
    }

    pub fn issuer(&self) -> String {
        format!("http://{}/entra", self.address)
    }

    pub fn jwks_uri(&self) -> String {
        format!("http://{}/entra/jwks", self.address)
    }

    pub fn authorization_endpoint(&self) -> String {
        format!("http://{}/entra/authorize", self.address)
    }

    pub fn token_endpoint(&self) -> String {
        format!("http://{}/entra/token", self.address)
    }
}

impl Drop for MockIdp {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
