use crate::config::Error::{MissingEnv, ParseFlow, ParseScope};
use log::info;
use serde::Serialize;
use thiserror::Error;

#[derive(Serialize, Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub environment: Environment,
    pub provider: Provider,
    pub docs: Docs,
}

/// Identity provider binding. Inbound bearer tokens must be issued by
/// `issuer` and carry `audience`; signatures are checked against the key
/// set published at `jwks_uri`.
#[derive(Serialize, Clone, Debug)]
pub struct Provider {
    pub issuer: String,
    pub audience: String,
    pub jwks_uri: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
}

/// Registration for the interactive documentation UI, which acts as an
/// OAuth2 public client of its own.
#[derive(Serialize, Clone, Debug)]
pub struct Docs {
    pub client_id: String,
    pub app_name: String,
    pub flow: SecurityFlow,
    pub scopes: Vec<Scope>,
}

/// A scope name mapped to the description shown during interactive consent.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Scope {
    pub name: String,
    pub description: String,
}

impl Scope {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// How the documentation UI acquires a credential to attach to its requests.
///
/// The implicit flow is the default as it requires no client secret in the
/// browser. The authorization code flow needs a confidential client, and the
/// API key variant leaves the user to paste a raw `Bearer` header value.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SecurityFlow {
    Implicit,
    AuthorizationCode,
    ApiKey,
}

impl SecurityFlow {
    fn parse(value: &str) -> Result<Self, Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "implicit" => Ok(Self::Implicit),
            "authorization_code" => Ok(Self::AuthorizationCode),
            "api_key" => Ok(Self::ApiKey),
            other => Err(ParseFlow(other.to_string())),
        }
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Self {
        // anything that isn't explicitly development is production
        if value.eq_ignore_ascii_case("development") {
            Self::Development
        } else {
            Self::Production
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing required environment variable '{0}'")]
    MissingEnv(String),

    #[error("unknown security flow '{0}': expected one of 'implicit', 'authorization_code', 'api_key'")]
    ParseFlow(String),

    #[error("malformed scope entry '{0}': expected 'scope=description'")]
    ParseScope(String),
}

impl Provider {
    fn new_from_env() -> Result<Self, Error> {
        Ok(Self {
            issuer: must_read_env("ENTRA_ISSUER")?,
            audience: must_read_env("ENTRA_AUDIENCE")?,
            jwks_uri: must_read_env("ENTRA_JWKS_URI")?,
            authorization_endpoint: must_read_env("ENTRA_AUTHORIZATION_ENDPOINT")?,
            token_endpoint: must_read_env("ENTRA_TOKEN_ENDPOINT")?,
        })
    }
}

impl Docs {
    fn new_from_env() -> Result<Self, Error> {
        let flow = match std::env::var("DOCS_FLOW") {
            Ok(value) => SecurityFlow::parse(&value)?,
            Err(_) => SecurityFlow::Implicit,
        };
        let scopes = match std::env::var("DOCS_SCOPES") {
            Ok(value) => parse_scopes(&value)?,
            Err(_) => default_scopes(),
        };
        Ok(Self {
            client_id: must_read_env("DOCS_CLIENT_ID")?,
            app_name: std::env::var("DOCS_APP_NAME").unwrap_or("swagger-ui-client".to_string()),
            flow,
            scopes,
        })
    }
}

/// Parse a comma separated list of `scope=description` entries.
/// Order is preserved; it is what the consent screen displays.
fn parse_scopes(value: &str) -> Result<Vec<Scope>, Error> {
    value
        .split_terminator(',')
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(name, description)| Scope::new(name.trim(), description.trim()))
                .ok_or_else(|| ParseScope(entry.to_string()))
        })
        .collect()
}

fn default_scopes() -> Vec<Scope> {
    vec![
        Scope::new("test-api/Invoice.Read", "Read access to the API"),
        Scope::new("test-api/Products.Read", "Let's find out together!"),
    ]
}

fn must_read_env(env: &str) -> Result<String, Error> {
    std::env::var(env).map_err(|_| MissingEnv(env.to_string()))
}

pub fn print_faktura_logo() {
    info!(r#"   ____      _    _                 "#);
    info!(r#"  / __/__ _ | | _| |_ _   _ _ __ __ _ "#);
    info!(r#" / _// _` || |/ / __| | | | '__/ _` |"#);
    info!(r#"/_/  \__,_||   <| |_| |_| | | | (_| |"#);
    info!(r#"           |_|\_\\__|\__,_|_|  \__,_|"#);
}

impl Config {
    pub fn new_from_env() -> Result<Self, Error> {
        Ok(Self {
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or("127.0.0.1:3000".to_string()),
            environment: std::env::var("ENVIRONMENT")
                .map(|value| Environment::parse(&value))
                .unwrap_or(Environment::Production),
            provider: Provider::new_from_env()?,
            docs: Docs::new_from_env()?,
        })
    }
}

impl Default for Config {
    /// Placeholder configuration mirroring an Entra ID app registration.
    /// Used by the OpenAPI export binary; the real values come from the
    /// environment at startup.
    fn default() -> Self {
        let tenant = "https://login.microsoftonline.com/acfefe3d-0f49-415f-a7d8-57050a01e985";
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            environment: Environment::Production,
            provider: Provider {
                issuer: format!("{tenant}/v2.0"),
                audience: "api://b1e43d8e-5c99-47e1-8adb-1967abfac058/test-api".to_string(),
                jwks_uri: format!("{tenant}/discovery/v2.0/keys"),
                authorization_endpoint: format!("{tenant}/oauth2/v2.0/authorize"),
                token_endpoint: format!("{tenant}/oauth2/v2.0/token"),
            },
            docs: Docs {
                client_id: "3ab70da9-4439-48e2-9b4f-fd0fe41a563d".to_string(),
                app_name: "swagger-ui-client".to_string(),
                flow: SecurityFlow::Implicit,
                scopes: default_scopes(),
            },
        }
    }
}
