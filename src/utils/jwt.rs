use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};

const ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Sent as the bearer credential on every API call
    Access,
    /// Only accepted by the refresh endpoint
    Refresh,
}

/// JWT claims: the subject is the user id as a string.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: i32, username: &str, token_type: TokenType, expiration_hours: i64) -> Self {
        let now = Timestamp::now();
        let exp = now
            .checked_add(SignedDuration::from_hours(expiration_hours))
            .unwrap_or(Timestamp::MAX);

        Self {
            sub: user_id.to_string(),
            username: username.to_string(),
            token_type,
            iat: now.as_second(),
            exp: exp.as_second(),
        }
    }

    /// The numeric user id carried in `sub`.
    pub fn user_id(&self) -> AppResult<i32> {
        self.sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid token subject"))
    }
}

/// An access/refresh pair issued at login, registration and refresh
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

pub fn generate_token(
    user_id: i32,
    username: &str,
    token_type: TokenType,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    let claims = Claims::new(user_id, username, token_type, expiration_hours);

    encode(
        &Header::new(ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

pub fn generate_token_pair(user_id: i32, username: &str, config: &JwtConfig) -> AppResult<TokenPair> {
    let access_token = generate_token(
        user_id,
        username,
        TokenType::Access,
        &config.secret,
        config.access_token_expiration,
    )?;
    let refresh_token = generate_token(
        user_id,
        username,
        TokenType::Refresh,
        &config.secret,
        config.refresh_token_expiration,
    )?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        expires_in: config.access_token_expiration * 3600,
    })
}

/// Validates signature, expiry and (optionally) the token type.
pub fn validate_token(
    token: &str,
    secret: &str,
    expected_type: Option<TokenType>,
) -> AppResult<Claims> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(ALGORITHM),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::unauthorized("Token has expired"),
        ErrorKind::InvalidToken => AppError::unauthorized("Invalid token"),
        ErrorKind::InvalidSignature => AppError::unauthorized("Invalid token signature"),
        _ => AppError::unauthorized(format!("Token validation failed: {}", e)),
    })?;

    if let Some(expected) = expected_type
        && claims.token_type != expected
    {
        return Err(AppError::unauthorized(format!(
            "Invalid token type: expected {:?}, got {:?}",
            expected, claims.token_type
        )));
    }

    Ok(claims)
}

pub fn validate_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Access))
}

pub fn validate_refresh_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Refresh))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test_secret_key_for_jwt_testing_0123456789";

    fn config() -> JwtConfig {
        JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiration: 1,
            refresh_token_expiration: 168,
        }
    }

    #[test]
    fn test_generate_token_pair() {
        let pair = generate_token_pair(7, "lisa", &config()).unwrap();

        assert!(pair.access_token.contains('.'));
        assert_ne!(pair.access_token, pair.refresh_token);
        assert_eq!(pair.expires_in, 3600);
    }

    #[test]
    fn test_validate_token_success() {
        let token = generate_token(7, "lisa", TokenType::Access, TEST_SECRET, 24).unwrap();
        let claims = validate_token(&token, TEST_SECRET, None).unwrap();

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.username, "lisa");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_validate_access_and_refresh() {
        let pair = generate_token_pair(1, "karen", &config()).unwrap();

        assert!(validate_access_token(&pair.access_token, TEST_SECRET).is_ok());
        assert!(validate_refresh_token(&pair.refresh_token, TEST_SECRET).is_ok());
    }

    #[test]
    fn test_validate_wrong_token_type() {
        let pair = generate_token_pair(1, "karen", &config()).unwrap();

        match validate_refresh_token(&pair.access_token, TEST_SECRET) {
            Err(AppError::Unauthorized { message }) => {
                assert!(message.contains("Invalid token type"))
            }
            other => panic!("Expected Unauthorized error, got: {:?}", other),
        }
    }

    #[test]
    fn test_validate_wrong_secret() {
        let token = generate_token(1, "karen", TokenType::Access, TEST_SECRET, 1).unwrap();
        let result = validate_access_token(&token, "another_secret_key_that_is_long_enough");

        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[test]
    fn test_validate_expired_token() {
        let token = generate_token(1, "karen", TokenType::Access, TEST_SECRET, -2).unwrap();

        match validate_access_token(&token, TEST_SECRET) {
            Err(AppError::Unauthorized { message }) => assert_eq!(message, "Token has expired"),
            other => panic!("Expected expired token error, got: {:?}", other),
        }
    }

    #[test]
    fn test_garbage_token() {
        assert!(validate_access_token("not-a-token", TEST_SECRET).is_err());
    }

    #[test]
    fn test_non_numeric_subject() {
        let claims = Claims {
            sub: "abc".to_string(),
            ..Claims::new(1, "karen", TokenType::Access, 1)
        };
        assert!(claims.user_id().is_err());
    }
}
