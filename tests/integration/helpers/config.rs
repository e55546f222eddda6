use crate::helpers::idp::MockIdp;
use faktura::config::{Config, Docs, Environment, Provider, Scope, SecurityFlow};

/// Audience the server requires and the mock tokens carry.
pub const AUDIENCE: &str = "api://b1e43d8e-5c99-47e1-8adb-1967abfac058/test-api";

pub fn mock(idp: &MockIdp) -> Config {
    Config {
        bind_address: "127.0.0.1:0".to_string(),
        environment: Environment::Production,
        provider: Provider {
            issuer: idp.issuer(),
            audience: AUDIENCE.to_string(),
            jwks_uri: idp.jwks_uri(),
            authorization_endpoint: idp.authorization_endpoint(),
            token_endpoint: idp.token_endpoint(),
        },
        docs: Docs {
            client_id: "3ab70da9-4439-48e2-9b4f-fd0fe41a563d".to_string(),
            app_name: "swagger-ui-client".to_string(),
            flow: SecurityFlow::Implicit,
            scopes: vec![
                Scope::new("test-api/Invoice.Read", "Read access to the API"),
                Scope::new("test-api/Products.Read", "Let's find out together!"),
            ],
        },
    }
}
