//! Authentication-related Data Transfer Objects

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Gender, User};
use crate::services::Registration;
use crate::utils::jwt::TokenPair;

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Case-insensitive, stored lowercased
    #[validate(length(min = 1, max = 255, message = "Username is required"))]
    #[schema(example = "lisa")]
    pub username: String,
    #[validate(length(min = 4, max = 8, message = "You must specify a password between 4 and 8 characters"))]
    #[schema(example = "password", format = "password", min_length = 4, max_length = 8)]
    pub password: String,
    pub gender: Gender,
    #[validate(length(min = 1, max = 255, message = "Known as is required"))]
    #[schema(example = "Lisa")]
    pub known_as: String,
    #[schema(value_type = String, format = Date, example = "1995-04-12")]
    pub date_of_birth: Date,
    #[validate(length(min = 1, max = 255, message = "City is required"))]
    #[schema(example = "Oslo")]
    pub city: String,
    #[validate(length(min = 1, max = 255, message = "Country is required"))]
    #[schema(example = "Norway")]
    pub country: String,
}

impl From<RegisterRequest> for Registration {
    fn from(request: RegisterRequest) -> Self {
        Self {
            username: request.username,
            password: request.password,
            gender: request.gender,
            known_as: request.known_as,
            date_of_birth: request.date_of_birth,
            city: request.city,
            country: request.country,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "lisa")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "password", format = "password")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token cannot be empty"))]
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
}

/// The signed-in member as returned with a token pair
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "lisa")]
    pub username: String,
    #[schema(example = "Lisa")]
    pub known_as: String,
    pub gender: Gender,
}

impl From<User> for AccountInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            known_as: user.known_as,
            gender: user.gender,
        }
    }
}

/// Response of register and login
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: AccountInfo,
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub access_token: String,
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
    /// Access token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

impl AuthResponse {
    pub fn new(user: User, tokens: TokenPair) -> Self {
        Self {
            user: user.into(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(tokens: TokenPair) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
        }
    }
}
