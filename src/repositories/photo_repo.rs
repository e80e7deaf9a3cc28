//! Photo repository.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{NewPhoto, Photo};

#[derive(Clone)]
pub struct PhotoRepository {
    pool: AsyncDbPool,
}

impl PhotoRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_photo: NewPhoto) -> Result<Photo, AppError> {
        use crate::schema::photos::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(photos)
            .values(&new_photo)
            .returning(Photo::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_by_id(&self, photo_id: i32) -> Result<Option<Photo>, AppError> {
        use crate::schema::photos::dsl::*;
        let mut conn = self.pool.get().await?;

        photos
            .filter(id.eq(photo_id))
            .select(Photo::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// A member's photos, main photo first and then in upload order.
    pub async fn list_for_user(&self, owner_id: i32) -> Result<Vec<Photo>, AppError> {
        use crate::schema::photos::dsl::*;
        let mut conn = self.pool.get().await?;

        photos
            .filter(user_id.eq(owner_id))
            .order((is_main.desc(), id.asc()))
            .select(Photo::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Main photo URL for each of `owner_ids` that has one.
    pub async fn main_urls(&self, owner_ids: &[i32]) -> Result<HashMap<i32, String>, AppError> {
        use crate::schema::photos::dsl::*;
        if owner_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.pool.get().await?;

        let rows: Vec<(i32, String)> = photos
            .filter(user_id.eq_any(owner_ids))
            .filter(is_main.eq(true))
            .select((user_id, url))
            .load(&mut conn)
            .await?;

        Ok(rows.into_iter().collect())
    }

    pub async fn count_for_user(&self, owner_id: i32) -> Result<i64, AppError> {
        use crate::schema::photos::dsl::*;
        let mut conn = self.pool.get().await?;

        photos
            .filter(user_id.eq(owner_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Makes `photo_id` the owner's main photo.
    ///
    /// At most one main photo per member is enforced by a partial unique
    /// index, so the current main is cleared before the new one is set, both
    /// inside one transaction.
    pub async fn set_main(&self, owner_id: i32, photo_id: i32) -> Result<Photo, AppError> {
        use crate::schema::photos::dsl::*;
        let mut conn = self.pool.get().await?;

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                diesel::update(photos.filter(user_id.eq(owner_id)).filter(is_main.eq(true)))
                    .set(is_main.eq(false))
                    .execute(conn)
                    .await?;

                let photo = diesel::update(photos.filter(id.eq(photo_id)))
                    .set(is_main.eq(true))
                    .returning(Photo::as_returning())
                    .get_result(conn)
                    .await?;

                Ok(photo)
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn delete(&self, photo_id: i32) -> Result<usize, AppError> {
        use crate::schema::photos::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(photos.filter(id.eq(photo_id)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
