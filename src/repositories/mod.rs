//! Repository layer for data access operations.
//!
//! Repositories only load and store rows. Filtering, ordering and paging of
//! listings live in [`crate::query`].

mod like_repo;
mod message_repo;
mod photo_repo;
mod user_repo;

pub use like_repo::LikeRepository;
pub use message_repo::MessageRepository;
pub use photo_repo::PhotoRepository;
pub use user_repo::UserRepository;

use crate::db::AsyncDbPool;

/// Aggregates all repositories. Cloning is cheap since every repository
/// only holds the Arc-backed pool.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub photos: PhotoRepository,
    pub likes: LikeRepository,
    pub messages: MessageRepository,
}

impl Repositories {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            photos: PhotoRepository::new(pool.clone()),
            likes: LikeRepository::new(pool.clone()),
            messages: MessageRepository::new(pool),
        }
    }
}
