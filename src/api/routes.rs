//! Router assembly: route groups, middleware stack and the API explorer.

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::dto::PAGINATION_HEADER;
use crate::api::handlers;
use crate::api::middleware::{
    REQUEST_ID_HEADER, activity_middleware, auth_middleware, global_error_handler,
    logging_middleware, request_id_middleware,
};
use crate::config::{Environment, ServerConfig};
use crate::state::AppState;

/// Upper bound for photo uploads.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Builds the application router.
///
/// # Routes
/// - `/api/auth/*` - public
/// - `/api/health`, `/api/health/ready` - public
/// - `/api/users/*`, including nested photos and messages - bearer token
/// - `/swagger-ui`, `/api-docs/openapi.json` - outside staging and production
///
/// # Middleware Order
/// Last added runs first: request id, logging, CORS, compression, then the
/// error body rewriter closest to the handlers.
pub fn create_router(state: AppState, server: &ServerConfig, environment: Environment) -> Router {
    let protected = OpenApiRouter::new()
        .nest("/users", handlers::users::user_routes())
        .nest(
            "/users/{userId}/photos",
            handlers::photos::photo_routes().layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .nest("/users/{userId}/messages", handlers::messages::message_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            activity_middleware,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api = OpenApiRouter::new()
        .nest("/auth", handlers::auth::auth_routes())
        .merge(handlers::health::health_routes())
        .merge(protected);

    let (router, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", api)
        .split_for_parts();

    let router = if environment.is_production() {
        router
    } else {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    router
        .layer(middleware::from_fn(global_error_handler))
        .layer(CompressionLayer::new())
        .layer(cors_layer(&server.cors_origins))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// CORS for the configured origins. The `Pagination` header is exposed so
/// browser clients can read paging totals.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let parsed = origins.iter().filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| tracing::warn!(origin = %origin, "Ignoring invalid CORS origin"))
                .ok()
        });
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(PAGINATION_HEADER),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::external::DisabledImageHost;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use diesel_async::AsyncPgConnection;
    use diesel_async::pooled_connection::AsyncDieselConnectionManager;
    use diesel_async::pooled_connection::bb8::Pool;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// A router whose pool never connects; good for everything that stops
    /// before the database.
    fn test_router(environment: Environment) -> Router {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(
            "postgres://nobody@127.0.0.1:1/none",
        );
        let pool = Pool::builder().build_unchecked(manager);
        let jwt = JwtConfig {
            secret: "router_test_secret_0123456789abcdef".to_string(),
            ..Default::default()
        };
        let state = AppState::new(pool, jwt, Arc::new(DisabledImageHost));
        create_router(state, &ServerConfig::default(), environment)
    }

    async fn send(router: Router, request: Request<Body>) -> axum::response::Response {
        router.oneshot(request).await.unwrap()
    }

    async fn json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_liveness_is_public() {
        let response = send(
            test_router(Environment::Test),
            Request::get("/api/health").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_users_require_token() {
        let response = send(
            test_router(Environment::Test),
            Request::get("/api/users")
                .header(REQUEST_ID_HEADER, "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json(response).await;
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(body["request_id"], "req-42");
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let response = send(
            test_router(Environment::Test),
            Request::get("/api/users/1/messages")
                .header(header::AUTHORIZATION, "Bearer not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_validation_runs_before_database() {
        let body = serde_json::json!({
            "username": "lisa",
            "password": "far-too-long-password",
            "gender": "female",
            "knownAs": "Lisa",
            "dateOfBirth": "1995-04-12",
            "city": "Oslo",
            "country": "Norway"
        });
        let response = send(
            test_router(Environment::Test),
            Request::post("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_openapi_document_served_outside_production() {
        let response = send(
            test_router(Environment::Development),
            Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let doc = json(response).await;
        assert!(doc["paths"]["/api/auth/login"].is_object());
        assert!(doc["components"]["securitySchemes"]["bearerAuth"].is_object());
    }

    #[tokio::test]
    async fn test_openapi_document_hidden_in_production() {
        let response = send(
            test_router(Environment::Production),
            Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
