//! Registration, login and token refresh.

use jiff::civil::Date;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::models::{Gender, NewUser, User};
use crate::repositories::UserRepository;
use crate::utils::jwt::{TokenPair, generate_token_pair, validate_refresh_token};
use crate::utils::password::{hash_password, verify_password};

/// Everything needed to open an account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub gender: Gender,
    pub known_as: String,
    pub date_of_birth: Date,
    pub city: String,
    pub country: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(users: UserRepository, jwt: JwtConfig) -> Self {
        Self { users, jwt }
    }

    /// Creates the account and signs the new member in.
    ///
    /// Usernames are case-insensitive and stored lowercased.
    pub async fn register(&self, registration: Registration) -> AppResult<(User, TokenPair)> {
        let username = normalize_username(&registration.username);

        if self.users.username_exists(&username).await? {
            return Err(AppError::bad_request("Username already exists"));
        }

        let new_user = NewUser {
            username,
            password_hash: hash_password(&registration.password)?,
            gender: registration.gender,
            date_of_birth: registration.date_of_birth.into(),
            known_as: registration.known_as.trim().to_string(),
            city: registration.city.trim().to_string(),
            country: registration.country.trim().to_string(),
        };

        let user = match self.users.create(new_user).await {
            Ok(user) => user,
            // Lost a race with a concurrent registration of the same name.
            Err(AppError::Duplicate { .. }) => {
                return Err(AppError::bad_request("Username already exists"));
            }
            Err(e) => return Err(e),
        };

        tracing::info!(user_id = user.id, username = %user.username, "Member registered");
        let tokens = generate_token_pair(user.id, &user.username, &self.jwt)?;
        Ok((user, tokens))
    }

    /// Checks the credentials. Unknown usernames and wrong passwords produce
    /// the same error.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(User, TokenPair)> {
        let username = normalize_username(username);
        let user = self
            .users
            .find_by_username(&username)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(user_id = user.id, "Password mismatch");
            return Err(invalid_credentials());
        }

        let tokens = generate_token_pair(user.id, &user.username, &self.jwt)?;
        Ok((user, tokens))
    }

    /// Exchanges a refresh token for a new pair, provided the member still exists.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = validate_refresh_token(refresh_token, &self.jwt.secret)?;
        let user = self
            .users
            .find_by_id(claims.user_id()?)
            .await?
            .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

        generate_token_pair(user.id, &user.username, &self.jwt)
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid username or password")
}

pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  Lisa "), "lisa");
        assert_eq!(normalize_username("BOB"), "bob");
    }
}
