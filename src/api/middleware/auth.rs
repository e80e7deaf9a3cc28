//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_access_token};

/// The authenticated caller, inserted into request extensions by
/// [`auth_middleware`] and read with `Extension<AuthUser>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
}

impl AuthUser {
    /// Rejects the request unless the caller is `user_id`.
    pub fn ensure_is(&self, user_id: i32) -> AppResult<()> {
        if self.user_id != user_id {
            return Err(AppError::unauthorized(
                "You can only act on your own account",
            ));
        }
        Ok(())
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: claims.user_id()?,
            username: claims.username,
        })
    }
}

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(value: Option<&str>) -> AppResult<&str> {
    let value = value.ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format. Expected: Bearer <token>")
        })
}

/// Validates the access token and stores the caller as [`AuthUser`].
///
/// Responds 401 when the header is missing or malformed, or the token is
/// expired, forged or a refresh token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let token = bearer_token(header_value)?;

    let claims = validate_access_token(token, &state.jwt_config.secret)?;
    let auth_user = AuthUser::try_from(claims)?;
    tracing::debug!(user_id = auth_user.user_id, "Request authenticated");

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::TokenType;

    fn claims(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            username: "lisa".to_string(),
            token_type: TokenType::Access,
            iat: 0,
            exp: 9_999_999_999,
        }
    }

    #[test]
    fn test_auth_user_from_claims() {
        let user = AuthUser::try_from(claims("123")).unwrap();
        assert_eq!(user.user_id, 123);
        assert_eq!(user.username, "lisa");
    }

    #[test]
    fn test_auth_user_rejects_non_numeric_subject() {
        assert!(matches!(
            AuthUser::try_from(claims("abc")),
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc.def")).unwrap(), "abc.def");
        assert!(bearer_token(None).is_err());
        assert!(bearer_token(Some("Basic abc")).is_err());
        assert!(bearer_token(Some("Bearer ")).is_err());
    }

    #[test]
    fn test_ensure_is() {
        let user = AuthUser {
            user_id: 5,
            username: "lisa".to_string(),
        };
        assert!(user.ensure_is(5).is_ok());
        assert!(matches!(user.ensure_is(6), Err(AppError::Unauthorized { .. })));
    }
}
