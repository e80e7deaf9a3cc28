use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const AUTH_TAG: &str = "Auth";
pub const USER_TAG: &str = "Users";
pub const PHOTO_TAG: &str = "Photos";
pub const MESSAGE_TAG: &str = "Messages";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dating API",
        description = "Member profiles, photos, likes and messaging",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::api::dto::PaginationMeta,
            crate::models::Gender,
        )
    ),
    tags(
        (name = AUTH_TAG, description = "Registration and sign-in"),
        (name = USER_TAG, description = "Member search, profiles and likes"),
        (name = PHOTO_TAG, description = "Profile photos"),
        (name = MESSAGE_TAG, description = "Direct messages"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /api/auth/login"))
                        .build(),
                ),
            )
        }
    }
}
