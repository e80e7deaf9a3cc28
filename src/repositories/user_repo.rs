//! User repository for async database operations.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{NewUser, UpdateUser, User};

/// User repository holding an async connection pool.
///
/// `AsyncDbPool` is Arc-backed, so cloning the repository is cheap.
#[derive(Clone)]
pub struct UserRepository {
    pool: AsyncDbPool,
}

impl UserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Inserts a member and returns the stored row with its generated id.
    pub async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(id.eq(user_id))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Looks a member up by username. Usernames are stored lowercased, so
    /// callers pass the normalized form.
    pub async fn find_by_username(&self, name: &str) -> Result<Option<User>, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(username.eq(name))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn username_exists(&self, name: &str) -> Result<bool, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::select(diesel::dsl::exists(users.filter(username.eq(name))))
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Every member except `excluded_id`, the candidate set for the listing
    /// filter.
    pub async fn list_candidates(&self, excluded_id: i32) -> Result<Vec<User>, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(id.ne(excluded_id))
            .order(id.asc())
            .select(User::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_many(&self, user_ids: &[i32]) -> Result<Vec<User>, AppError> {
        use crate::schema::users::dsl::*;
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await?;

        users
            .filter(id.eq_any(user_ids))
            .select(User::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Applies the editable profile fields. `None` fields are left untouched.
    pub async fn update(&self, user_id: i32, update_data: UpdateUser) -> Result<User, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        if update_data.is_empty() {
            return users
                .filter(id.eq(user_id))
                .select(User::as_select())
                .first(&mut conn)
                .await
                .map_err(AppError::from);
        }

        diesel::update(users.filter(id.eq(user_id)))
            .set(&update_data)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Stamps `last_active` with the database clock. Returns the number of
    /// rows touched, zero when the member no longer exists.
    pub async fn touch_last_active(&self, user_id: i32) -> Result<usize, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(users.filter(id.eq(user_id)))
            .set(last_active.eq(diesel::dsl::now))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
