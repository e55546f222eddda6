use faktura::config::Config;
use faktura::handler::State;
use faktura::http;
use faktura::oauth::token::Jwks;
use std::io::Write;

/// Write the OpenAPI specification to standard output.
#[tokio::main]
async fn main() {
    let mut stdout = std::io::stdout();
    let cfg = Config::default();
    let jwks = Jwks::new_empty(
        &cfg.provider.issuer,
        &cfg.provider.jwks_uri,
        &cfg.provider.audience,
    );
    let (_, openapi) = http::router::api(State::new(cfg, jwks));
    let data = openapi.to_pretty_json().unwrap();
    stdout.write_all(data.as_bytes()).unwrap();
}
