//! Member profiles, search and likes.

use jiff::civil::Date;

use crate::error::{AppError, AppResult};
use crate::models::{Like, Photo, UpdateUser, User};
use crate::query::{LikeSets, PageRequest, PagedList, UserFilter};
use crate::repositories::{LikeRepository, PhotoRepository, UserRepository};

/// A search result: the member, their age today and their main photo.
#[derive(Debug, Clone)]
pub struct ProfileCard {
    pub user: User,
    pub age: i16,
    pub photo_url: Option<String>,
}

/// A full profile with every photo, main photo first.
#[derive(Debug, Clone)]
pub struct ProfileDetail {
    pub user: User,
    pub age: i16,
    pub photos: Vec<Photo>,
}

impl ProfileDetail {
    pub fn main_photo_url(&self) -> Option<&str> {
        self.photos
            .iter()
            .find(|photo| photo.is_main)
            .map(|photo| photo.url.as_str())
    }
}

#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
    photos: PhotoRepository,
    likes: LikeRepository,
}

impl UserService {
    pub fn new(users: UserRepository, photos: PhotoRepository, likes: LikeRepository) -> Self {
        Self {
            users,
            photos,
            likes,
        }
    }

    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user", "id", id))
    }

    pub async fn get_profile(&self, id: i32) -> AppResult<ProfileDetail> {
        let user = self.get_user(id).await?;
        let photos = self.photos.list_for_user(id).await?;

        Ok(ProfileDetail {
            age: user.age(today()),
            user,
            photos,
        })
    }

    /// Searches members on behalf of `filter.current_user_id`.
    ///
    /// Without an explicit gender the listing shows the opposite of the
    /// caller's own gender.
    pub async fn search(
        &self,
        mut filter: UserFilter,
        page: PageRequest,
    ) -> AppResult<PagedList<ProfileCard>> {
        let caller = self.get_user(filter.current_user_id).await?;
        if filter.gender.is_none() {
            filter.gender = Some(caller.gender.opposite());
        }

        let like_sets = if filter.needs_like_sets() {
            LikeSets {
                likers: self.likes.liker_ids(caller.id).await?,
                likees: self.likes.likee_ids(caller.id).await?,
            }
        } else {
            LikeSets::default()
        };

        let today = today();
        let candidates = self.users.list_candidates(caller.id).await?;
        let candidate_count = candidates.len();
        let paged = filter.apply(candidates, &like_sets, today, page);

        let ids: Vec<i32> = paged.items().iter().map(|user| user.id).collect();
        let mut urls = self.photos.main_urls(&ids).await?;

        tracing::debug!(
            user_id = caller.id,
            candidates = candidate_count,
            matched = paged.meta().total_count,
            "Member search"
        );

        Ok(paged.map(|user| ProfileCard {
            age: user.age(today),
            photo_url: urls.remove(&user.id),
            user,
        }))
    }

    pub async fn update_profile(&self, id: i32, changes: UpdateUser) -> AppResult<User> {
        self.get_user(id).await?;
        self.users.update(id, changes).await
    }

    /// Records that `liker_id` likes `likee_id`.
    pub async fn like(&self, liker_id: i32, likee_id: i32) -> AppResult<Like> {
        if liker_id == likee_id {
            return Err(AppError::bad_request("You cannot like yourself"));
        }
        if self.users.find_by_id(likee_id).await?.is_none() {
            return Err(AppError::not_found("user", "id", likee_id));
        }
        if self.likes.exists(liker_id, likee_id).await? {
            return Err(AppError::bad_request("You already like this user"));
        }

        let like = self.likes.create(Like { liker_id, likee_id }).await?;
        tracing::info!(liker_id, likee_id, "Like recorded");
        Ok(like)
    }

    pub async fn record_activity(&self, id: i32) -> AppResult<()> {
        self.users.touch_last_active(id).await?;
        Ok(())
    }
}

/// The local calendar date ages are measured against.
pub fn today() -> Date {
    jiff::Zoned::now().date()
}
