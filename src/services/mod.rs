//! Service layer for business logic operations.
//!
//! Services enforce the membership rules and coordinate repositories, the
//! listing core and the image host.

mod auth_service;
mod message_service;
mod photo_service;
mod user_service;

pub use auth_service::{AuthService, Registration, normalize_username};
pub use message_service::{MessageService, MessageView, Party};
pub use photo_service::{PhotoService, PhotoUpload};
pub use user_service::{ProfileCard, ProfileDetail, UserService, today};

use std::sync::Arc;

use crate::config::JwtConfig;
use crate::external::ImageHost;
use crate::repositories::Repositories;

/// Aggregates all services. Cloning is cheap: repositories share the pool and
/// the image host sits behind an `Arc`.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub users: UserService,
    pub photos: PhotoService,
    pub messages: MessageService,
}

impl Services {
    pub fn new(repos: Repositories, jwt: JwtConfig, image_host: Arc<dyn ImageHost>) -> Self {
        Self {
            auth: AuthService::new(repos.users.clone(), jwt),
            users: UserService::new(repos.users.clone(), repos.photos.clone(), repos.likes),
            photos: PhotoService::new(repos.photos.clone(), repos.users.clone(), image_host),
            messages: MessageService::new(repos.messages, repos.users, repos.photos),
        }
    }
}
