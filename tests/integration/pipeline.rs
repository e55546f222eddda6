use axum::Router;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::routing::get;
use faktura::config::Environment;
use faktura::handler::{AuthErrorCode, ErrorResponse};
use faktura::http::middleware;
use pretty_assertions::assert_eq;
use test_log::test;
use tokio::task::JoinHandle;

async fn boom() -> &'static str {
    panic!("kaboom at the invoice printer")
}

async fn serve(router: Router) -> (String, JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    let join_handler = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (address, join_handler)
}

/// A panicking handler in development answers 500 and echoes the panic
/// message to the caller.
#[test(tokio::test)]
async fn panicking_handler_echoes_detail_in_development() {
    let router = Router::new()
        .route("/boom", get(boom))
        .layer(middleware::catch_panic_layer(Environment::Development));
    let (address, join_handler) = serve(router).await;

    let response =
        reqwest::Client::new().get(format!("http://{address}/boom")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.error, AuthErrorCode::ServerError);
    assert!(body.description.contains("kaboom at the invoice printer"));

    join_handler.abort();
}

/// The same panic in production answers 500 with a generic body.
#[test(tokio::test)]
async fn panicking_handler_hides_detail_in_production() {
    let router = Router::new()
        .route("/boom", get(boom))
        .layer(middleware::catch_panic_layer(Environment::Production));
    let (address, join_handler) = serve(router).await;

    let response =
        reqwest::Client::new().get(format!("http://{address}/boom")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.error, AuthErrorCode::ServerError);
    assert!(!body.description.contains("kaboom"));
    assert!(body.description.contains("internal server error"));

    join_handler.abort();
}

/// Authorization layered without authentication in front of it is a pipeline
/// ordering bug; it must fail closed with a 500 instead of letting the
/// request through.
#[test(tokio::test)]
async fn authorization_without_authentication_fails_closed() {
    let router = Router::new().route("/things", get(|| async { "unreachable" })).layer(
        axum::middleware::from_fn(|request: Request, next: Next| {
            middleware::require_scope("test-api/Invoice.Read", request, next)
        }),
    );
    let (address, join_handler) = serve(router).await;

    let response =
        reqwest::Client::new().get(format!("http://{address}/things")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.error, AuthErrorCode::ServerError);

    join_handler.abort();
}
