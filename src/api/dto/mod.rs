//! Data Transfer Objects for API requests and responses.
//!
//! JSON bodies use camelCase field names throughout.

mod auth;
mod error;
mod health;
mod message;
mod pagination;
mod photo;
mod user;

pub use auth::{
    AccountInfo, AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest, TokenResponse,
};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use message::{CreateMessageRequest, MessageListQuery, MessageResponse};
pub use pagination::{PAGINATION_HEADER, PagedResponse, PaginationHeader, PaginationMeta};
pub use photo::{PhotoResponse, PhotoUploadForm};
pub use user::{UpdateUserRequest, UserDetail, UserListQuery, UserSummary};
