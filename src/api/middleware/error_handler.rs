//! Converts errors into the JSON [`ErrorResponse`] body.
//!
//! Internal failures are logged with their source chain but answered with a
//! generic message.

use axum::{
    Json,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::request_id::current_request_id;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error_to_response_with_request_id(self, current_request_id())
    }
}

/// Maps an AppError variant to its HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => StatusCode::BAD_REQUEST,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::ExternalService { .. } => StatusCode::BAD_GATEWAY,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Unauthorized { .. } => "UNAUTHORIZED",
        AppError::Forbidden { .. } => "FORBIDDEN",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

fn error_body(error: &AppError) -> ErrorResponse {
    let code = error_to_code(error);
    match error {
        AppError::NotFound {
            entity,
            field,
            value,
        } => ErrorResponse::not_found_error(entity, field, value),
        AppError::Duplicate {
            entity,
            field,
            value,
        } => ErrorResponse::duplicate_error(entity, field, value),
        AppError::Validation { field, reason } => ErrorResponse::validation_error(field, reason),
        AppError::ValidationErrors { errors } => ErrorResponse::validation_errors(errors),
        AppError::BadRequest { message }
        | AppError::Unauthorized { message }
        | AppError::Forbidden { message } => ErrorResponse::new(code, message),
        AppError::ExternalService { service, .. } => ErrorResponse::new(
            code,
            &format!("The {} service is unavailable", service.replace('_', " ")),
        ),
        AppError::ConnectionPool { .. } => {
            ErrorResponse::new(code, "Database connection unavailable")
        }
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            ErrorResponse::new(code, "An internal error occurred")
        }
    }
}

/// Builds the response for `error`, tagging it with `request_id` when known.
pub fn error_to_response_with_request_id(error: AppError, request_id: Option<String>) -> Response {
    let status = error_to_status_code(&error);
    if status.is_server_error() || status == StatusCode::BAD_GATEWAY {
        tracing::error!(error = ?error, "Request failed");
    } else {
        tracing::debug!(error = %error, "Request rejected");
    }

    let mut body = error_body(&error);
    if let Some(id) = request_id {
        body = body.with_request_id(&id);
    }

    (status, Json(body)).into_response()
}

/// Rewrites error responses that are not JSON yet, such as axum's plain-text
/// path rejections and the router's 404/405, into [`ErrorResponse`].
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));
    if is_json {
        return response;
    }

    let (parts, body) = response.into_parts();
    let original = axum::body::to_bytes(body, 64 * 1024)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
        .unwrap_or_default();

    let (code, fallback) = match status {
        StatusCode::BAD_REQUEST => ("BAD_REQUEST", "Bad request"),
        StatusCode::UNAUTHORIZED => ("UNAUTHORIZED", "Authentication required"),
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            ("METHOD_NOT_ALLOWED", "HTTP method not allowed for this endpoint")
        }
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        s if s.is_server_error() => ("INTERNAL_ERROR", "An internal error occurred"),
        _ => ("REQUEST_ERROR", "The request could not be processed"),
    };

    // Server-side text may leak internals; client-side text is axum's own
    // rejection message.
    let message = if original.is_empty() || status.is_server_error() {
        fallback.to_string()
    } else {
        original
    };

    let mut body = ErrorResponse::new(code, &message);
    if let Some(id) = current_request_id() {
        body = body.with_request_id(&id);
    }

    let mut response = (status, Json(body)).into_response();
    for (name, value) in parts.headers.iter() {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            response.headers_mut().insert(name.clone(), value.clone());
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFieldError;
    use axum::{Router, body::Body, middleware, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::not_found("user", "id", 1), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (AppError::bad_request("x"), StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            (AppError::unauthorized("x"), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (
                AppError::ValidationErrors { errors: vec![] },
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                AppError::ExternalService {
                    service: "image_host".to_string(),
                    message: "timeout".to_string(),
                },
                StatusCode::BAD_GATEWAY,
                "EXTERNAL_SERVICE_ERROR",
            ),
            (
                AppError::ConnectionPool {
                    source: anyhow::anyhow!("Pool exhausted"),
                },
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(error_to_status_code(&error), status);
            assert_eq!(error_to_code(&error), code);
        }
    }

    #[tokio::test]
    async fn test_bad_request_keeps_message() {
        let response = AppError::bad_request("You already like this user").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["message"], "You already like this user");
    }

    #[tokio::test]
    async fn test_internal_error_is_sanitized() {
        let error = AppError::Database {
            operation: "select users".to_string(),
            source: anyhow::anyhow!("password=hunter2 host=db"),
        };
        let body = json_body(error_to_response_with_request_id(error, Some("req-9".to_string()))).await;

        assert_eq!(body["message"], "An internal error occurred");
        assert_eq!(body["request_id"], "req-9");
        assert!(!body.to_string().contains("hunter2"));
    }

    #[tokio::test]
    async fn test_validation_errors_listed() {
        let error = AppError::ValidationErrors {
            errors: vec![ValidationFieldError {
                field: "password".to_string(),
                message: "too short".to_string(),
            }],
        };
        let body = json_body(error.into_response()).await;
        assert_eq!(body["details"]["errors"][0]["message"], "too short");
    }

    #[tokio::test]
    async fn test_global_handler_wraps_plain_text_errors() {
        let app = Router::new()
            .route(
                "/plain",
                get(|| async { (StatusCode::BAD_REQUEST, "Invalid URL: bad id") }),
            )
            .layer(middleware::from_fn(global_error_handler));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/plain").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["message"], "Invalid URL: bad id");

        let missing = app
            .oneshot(Request::builder().uri("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(missing).await["code"], "NOT_FOUND");
    }
}
