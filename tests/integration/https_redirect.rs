use crate::helpers::config::AUDIENCE;
use crate::helpers::jwt::{Token, user_claims, with_scope};
use crate::helpers::server::TestServer;
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use test_log::test;

fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder().redirect(reqwest::redirect::Policy::none()).build().unwrap()
}

/// Plaintext requests are answered with a redirect to the encrypted
/// equivalent before any authentication runs.
#[test(tokio::test)]
async fn plaintext_requests_are_redirected() {
    let server = TestServer::new().await;
    let address = server.address();
    let join_handler = tokio::spawn(async move {
        server.run().await;
    });

    // no Authorization header: the redirect must win over the 401
    let response = no_redirect_client()
        .get(format!("http://{address}/api/v1/invoices?page=2"))
        .header("x-forwarded-proto", "http")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        response.headers().get("location").and_then(|value| value.to_str().ok()),
        Some(format!("https://{address}/api/v1/invoices?page=2").as_str())
    );

    // documentation endpoints sit behind the same enforcement
    let response = no_redirect_client()
        .get(format!("http://{address}/api-docs/openapi.json"))
        .header("x-forwarded-proto", "http")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);

    join_handler.abort();
}

/// Requests that already arrived encrypted pass through to authentication.
#[test(tokio::test)]
async fn forwarded_https_requests_pass_through() {
    let server = TestServer::new().await;
    let address = server.address();
    let issuer = server.cfg.provider.issuer.clone();
    let join_handler = tokio::spawn(async move {
        server.run().await;
    });

    let token = Token::sign(with_scope(
        user_claims(&issuer, AUDIENCE),
        "test-api/Invoice.Read",
    ));
    let response = no_redirect_client()
        .get(format!("http://{address}/api/v1/invoices"))
        .header("x-forwarded-proto", "https")
        .header("authorization", format!("Bearer {token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // and without a token, it is the authentication stage that rejects
    let response = no_redirect_client()
        .get(format!("http://{address}/api/v1/invoices"))
        .header("x-forwarded-proto", "https")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    join_handler.abort();
}
