use crate::gardisto::handlers;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::register::register,
        handlers::login::login,
        handlers::me::me,
        handlers::users::users,
        handlers::admin::dashboard,
        handlers::account::change_password,
    ),
    components(schemas(
        handlers::register::RegisterRequest,
        handlers::login::LoginRequest,
        handlers::account::ChangePasswordRequest,
    )),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "register", description = "Account creation"),
        (name = "login", description = "Credential exchange for bearer tokens"),
        (name = "api", description = "Token-protected endpoints"),
        (name = "admin", description = "Admin-only endpoints"),
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    if let Some(components) = doc.components.as_mut() {
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
    doc
}
