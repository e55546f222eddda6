pub mod claims;
pub mod config;
pub mod docs;
pub mod handler;
pub mod http;
pub mod oauth {
    pub mod token;
}
pub mod telemetry;
