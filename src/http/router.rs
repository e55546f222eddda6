use crate::docs;
use crate::handler;
use crate::http::middleware;
use axum::Router;
use axum::extract::{MatchedPath, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::get;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{Span, field, info_span};
use utoipa::{OpenApi, openapi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Build the API routes and the OpenAPI document describing them.
///
/// Every business route is wrapped in the authentication middleware, with
/// scope checks layered inside it so that authentication always runs first.
/// The security scheme declaration is attached to the document here so the
/// exported description matches what the running server enforces.
pub fn api(state: handler::State) -> (Router, openapi::OpenApi) {
    let cfg = state.cfg.clone();

    let invoices = OpenApiRouter::default()
        .routes(routes!(handler::list_invoices))
        .layer(axum::middleware::from_fn(|request: Request, next: Next| {
            middleware::require_scope(handler::INVOICE_READ, request, next)
        }));
    let products = OpenApiRouter::default()
        .routes(routes!(handler::list_products))
        .layer(axum::middleware::from_fn(|request: Request, next: Next| {
            middleware::require_scope(handler::PRODUCTS_READ, request, next)
        }));
    let me = OpenApiRouter::default().routes(routes!(handler::whoami));

    let api = OpenApiRouter::default()
        .merge(invoices)
        .merge(products)
        .merge(me)
        .layer(axum::middleware::from_fn_with_state(state, middleware::authenticate));

    let probes =
        OpenApiRouter::default().route("/healthz", get(|| async { (StatusCode::OK, "ok") }));

    let (router, mut openapi) = OpenApiRouter::with_openapi(docs::ApiDoc::openapi())
        .merge(api)
        .merge(probes)
        .split_for_parts();

    openapi.components.get_or_insert_with(Default::default).add_security_scheme(
        docs::SECURITY_SCHEME,
        docs::security_scheme(&cfg.provider, &cfg.docs),
    );

    (router, openapi)
}

/// Assemble the full request pipeline:
/// panic responder (detailed in development only), HTTPS enforcement,
/// request tracing, routing, authentication, authorization, documentation
/// endpoints, handler dispatch.
pub fn app(state: handler::State) -> Router {
    let environment = state.cfg.environment;
    let docs_cfg = state.cfg.docs.clone();

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(move |request: &Request| {
            // Log the matched route's path (with placeholders not filled in).
            // Use request.uri() or OriginalUri if you want the real path.
            let path = request.extensions().get::<MatchedPath>().map(MatchedPath::as_str);

            info_span!(
                "Handle incoming request",
                "http.request.method" = ?request.method(),
                "http.response.status_code" = field::Empty, // to be populated in on_response
                "http.route" = path,
                "http.version" = ?request.version(),
            )
        })
        .on_response(move |response: &Response, _latency: Duration, span: &Span| {
            span.record("http.response.status_code", response.status().as_u16());
        });

    let (router, openapi) = api(state);

    // Layers wrap bottom-up: the panic responder ends up outermost,
    // then HTTPS enforcement, then tracing, then routing.
    router
        .merge(docs::swagger_ui(&docs_cfg, openapi))
        .layer(trace_layer)
        .layer(axum::middleware::from_fn(middleware::redirect_https))
        .layer(middleware::catch_panic_layer(environment))
}
