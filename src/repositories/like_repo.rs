//! Like repository.

use std::collections::HashSet;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::Like;

#[derive(Clone)]
pub struct LikeRepository {
    pool: AsyncDbPool,
}

impl LikeRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, like: Like) -> Result<Like, AppError> {
        use crate::schema::likes::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(likes)
            .values(&like)
            .returning(Like::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn exists(&self, liker: i32, likee: i32) -> Result<bool, AppError> {
        use crate::schema::likes::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::select(diesel::dsl::exists(
            likes.filter(liker_id.eq(liker)).filter(likee_id.eq(likee)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(AppError::from)
    }

    /// Ids of the members who like `user_id`.
    pub async fn liker_ids(&self, user_id: i32) -> Result<HashSet<i32>, AppError> {
        use crate::schema::likes::dsl::*;
        let mut conn = self.pool.get().await?;

        let ids: Vec<i32> = likes
            .filter(likee_id.eq(user_id))
            .select(liker_id)
            .load(&mut conn)
            .await?;
        Ok(ids.into_iter().collect())
    }

    /// Ids of the members `user_id` likes.
    pub async fn likee_ids(&self, user_id: i32) -> Result<HashSet<i32>, AppError> {
        use crate::schema::likes::dsl::*;
        let mut conn = self.pool.get().await?;

        let ids: Vec<i32> = likes
            .filter(liker_id.eq(user_id))
            .select(likee_id)
            .load(&mut conn)
            .await?;
        Ok(ids.into_iter().collect())
    }
}
