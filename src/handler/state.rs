use crate::config::Config;
use crate::oauth::token;
use crate::oauth::token::Jwks;
use log::debug;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum InitError {
    #[error("fetch JWKS from remote endpoint: {0}")]
    Jwks(#[from] token::Error),
}

#[derive(Clone)]
pub struct State {
    pub cfg: Config,
    pub jwks: Arc<RwLock<Jwks>>,
}

impl State {
    pub async fn from_config(cfg: Config) -> Result<Self, InitError> {
        debug!("Fetch JWKS for '{}' from '{}'...", cfg.provider.issuer, cfg.provider.jwks_uri);
        let jwks = Jwks::new(
            &cfg.provider.issuer,
            &cfg.provider.jwks_uri,
            &cfg.provider.audience,
        )
        .await?;

        Ok(Self::new(cfg, jwks))
    }

    pub fn new(cfg: Config, jwks: Jwks) -> Self {
        Self {
            cfg,
            jwks: Arc::new(RwLock::new(jwks)),
        }
    }
}
