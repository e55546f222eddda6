use crate::config::{Docs, Provider, SecurityFlow};
use utoipa::OpenApi;
use utoipa::openapi::security::{
    ApiKey, ApiKeyValue, AuthorizationCode, Flow, Implicit, OAuth2, Scopes, SecurityScheme,
};
use utoipa_swagger_ui::{SwaggerUi, oauth};

/// Name under which the security scheme is registered in the OpenAPI
/// document. Operations reference it in their `security` requirements.
pub const SECURITY_SCHEME: &str = "bearer";

#[derive(OpenApi)]
#[openapi(info(
    title = "Faktura API",
    description = "Faktura is a bearer-protected invoice API with interactive OpenAPI documentation, so that you can log in straight from the docs.",
    contact(name = "Nais", url = "https://nais.io")
))]
pub struct ApiDoc;

/// Build the security scheme declaration for the configured flow.
///
/// The interactive viewer renders this as an "Authorize" action. For the
/// OAuth2 flows it redirects the browser to the configured authorization
/// endpoint and attaches the resulting token to calls made from the viewer.
pub fn security_scheme(provider: &Provider, docs: &Docs) -> SecurityScheme {
    let scopes = Scopes::from_iter(
        docs.scopes.iter().map(|scope| (scope.name.clone(), scope.description.clone())),
    );

    match docs.flow {
        SecurityFlow::Implicit => SecurityScheme::OAuth2(OAuth2::new([Flow::Implicit(
            Implicit::new(provider.authorization_endpoint.clone(), scopes),
        )])),
        SecurityFlow::AuthorizationCode => {
            SecurityScheme::OAuth2(OAuth2::new([Flow::AuthorizationCode(
                AuthorizationCode::new(
                    provider.authorization_endpoint.clone(),
                    provider.token_endpoint.clone(),
                    scopes,
                ),
            )]))
        }
        SecurityFlow::ApiKey => SecurityScheme::ApiKey(ApiKey::Header(
            ApiKeyValue::with_description(
                "Authorization",
                "Copy 'Bearer ' + a valid JWT into this field",
            ),
        )),
    }
}

/// Swagger UI pre-configured with the documentation client registration,
/// serving the rendered document and the machine readable description.
pub fn swagger_ui(docs: &Docs, openapi: utoipa::openapi::OpenApi) -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", openapi)
        .oauth(
            oauth::Config::new()
                .client_id(&docs.client_id)
                .app_name(&docs.app_name)
                .scopes(docs.scopes.iter().map(|scope| scope.name.clone()).collect()),
        )
}
