use crate::claims::Claims;
use crate::config::Environment;
use crate::handler;
use crate::handler::{AuthErrorCode, ErrorResponse};
use axum::Json;
use axum::body::Body;
use axum::extract::{Request, State as AxumState};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::any::Any;
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};
use tracing::instrument;

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Validate the bearer token on the request and attach the resulting
/// [`Claims`] as a request extension. Requests without a valid token are
/// rejected here and never reach the authorization stage or a handler.
#[instrument(skip_all, name = "Authenticate request")]
pub async fn authenticate(
    AxumState(state): AxumState<handler::State>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return unauthenticated("missing bearer token in authorization header");
    };

    // We need to acquire a write lock here because validation
    // might refresh the JWKS in-flight.
    match state.jwks.write().await.validate(token).await {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => unauthenticated(err.to_string()),
    }
}

/// Reject requests whose authenticated caller lacks `scope`.
/// Must be layered inside [`authenticate`]; running without it is a
/// pipeline ordering bug and fails closed.
pub async fn require_scope(scope: &'static str, request: Request, next: Next) -> Response {
    let Some(claims) = request.extensions().get::<Claims>() else {
        tracing::error!("authorization ran without authentication; check middleware order");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(
                AuthErrorCode::ServerError,
                "authentication did not run before authorization",
            )),
        )
            .into_response();
    };

    if !claims.has_scope(scope) {
        return (
            StatusCode::FORBIDDEN,
            [(
                header::WWW_AUTHENTICATE,
                format!(r#"Bearer error="insufficient_scope", scope="{scope}""#),
            )],
            Json(ErrorResponse::new(
                AuthErrorCode::InsufficientScope,
                format!("token is missing required scope '{scope}'"),
            )),
        )
            .into_response();
    }

    next.run(request).await
}

/// Answer plaintext requests with a redirect to the encrypted equivalent
/// before any authentication runs. Plaintext is detected through the
/// `x-forwarded-proto` header set by the terminating proxy.
pub async fn redirect_https(request: Request, next: Next) -> Response {
    let plaintext = request
        .headers()
        .get(X_FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("http"));

    if plaintext {
        if let Some(host) =
            request.headers().get(header::HOST).and_then(|value| value.to_str().ok())
        {
            let path_and_query =
                request.uri().path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
            return (
                StatusCode::PERMANENT_REDIRECT,
                [(header::LOCATION, format!("https://{host}{path_and_query}"))],
            )
                .into_response();
        }
    }

    next.run(request).await
}

pub fn catch_panic_layer(environment: Environment) -> CatchPanicLayer<PanicResponder> {
    CatchPanicLayer::custom(PanicResponder { environment })
}

/// Turns an unhandled panic into a 500 response. The panic message is only
/// echoed to the caller in the development environment; production callers
/// get a generic body.
#[derive(Clone, Copy)]
pub struct PanicResponder {
    environment: Environment,
}

impl PanicResponder {
    fn body(&self, detail: &str) -> String {
        let description = if self.environment.is_development() {
            format!("unhandled panic: {detail}")
        } else {
            "internal server error".to_string()
        };
        serde_json::to_string(&ErrorResponse::new(AuthErrorCode::ServerError, description))
            .expect("serializing a plain error response should not fail")
    }
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(
        &mut self,
        err: Box<dyn Any + Send + 'static>,
    ) -> axum::http::Response<Body> {
        let detail = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            (*s).to_string()
        } else {
            "non-string panic payload".to_string()
        };
        tracing::error!("Handler panicked: {detail}");

        axum::http::Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(self.body(&detail)))
            .expect("building a panic response should not fail")
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn unauthenticated(description: impl Into<String>) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(
            header::WWW_AUTHENTICATE,
            r#"Bearer error="invalid_token""#.to_string(),
        )],
        Json(ErrorResponse::new(AuthErrorCode::InvalidToken, description)),
    )
        .into_response()
}
