use axum::Json;
use axum::extract::{FromRequest, Request, rejection::JsonRejection};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// JSON body extractor that runs `validator` rules before the handler sees the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Credentials {
        #[validate(length(min = 1, message = "Username is required"))]
        username: String,
        #[validate(length(min = 4, max = 8, message = "You must specify a password between 4 and 8 characters"))]
        password: String,
    }

    fn json_request(body: &str, content_type: &str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/test")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let request = json_request(r#"{"username":"lisa","password":"password"}"#, "application/json");
        let ValidatedJson(credentials) = ValidatedJson::<Credentials>::from_request(request, &())
            .await
            .unwrap();

        assert_eq!(credentials.username, "lisa");
        assert_eq!(credentials.password, "password");
    }

    #[tokio::test]
    async fn test_validation_errors_are_collected() {
        let request = json_request(r#"{"username":"","password":"toolongpassword"}"#, "application/json");
        let error = ValidatedJson::<Credentials>::from_request(request, &())
            .await
            .unwrap_err();

        match error {
            AppError::ValidationErrors { errors } => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "password");
                assert!(errors[0].message.contains("between 4 and 8"));
                assert_eq!(errors[1].field, "username");
            }
            other => panic!("Expected ValidationErrors error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let request = json_request(r#"{"username":"lisa"}"#, "application/json");
        let error = ValidatedJson::<Credentials>::from_request(request, &())
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_wrong_content_type_is_bad_request() {
        let request = json_request(r#"{"username":"lisa","password":"password"}"#, "text/plain");
        let error = ValidatedJson::<Credentials>::from_request(request, &())
            .await
            .unwrap_err();

        match error {
            AppError::BadRequest { message } => assert!(!message.is_empty()),
            other => panic!("Expected BadRequest error, got {:?}", other),
        }
    }
}
