//! Message repository.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{Message, NewMessage, UpdateMessage};

#[derive(Clone)]
pub struct MessageRepository {
    pool: AsyncDbPool,
}

impl MessageRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_message: NewMessage) -> Result<Message, AppError> {
        use crate::schema::messages::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(messages)
            .values(&new_message)
            .returning(Message::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_by_id(&self, message_id: i32) -> Result<Option<Message>, AppError> {
        use crate::schema::messages::dsl::*;
        let mut conn = self.pool.get().await?;

        messages
            .filter(id.eq(message_id))
            .select(Message::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Every message `user_id` sent or received, deleted sides included.
    /// Container and deletion filtering happen in the listing core.
    pub async fn list_involving(&self, user_id: i32) -> Result<Vec<Message>, AppError> {
        use crate::schema::messages::dsl::*;
        let mut conn = self.pool.get().await?;

        messages
            .filter(sender_id.eq(user_id).or(recipient_id.eq(user_id)))
            .order(id.asc())
            .select(Message::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Messages exchanged in either direction between two members.
    pub async fn list_between(&self, user_id: i32, other_id: i32) -> Result<Vec<Message>, AppError> {
        use crate::schema::messages::dsl::*;
        let mut conn = self.pool.get().await?;

        messages
            .filter(
                sender_id
                    .eq(user_id)
                    .and(recipient_id.eq(other_id))
                    .or(sender_id.eq(other_id).and(recipient_id.eq(user_id))),
            )
            .order(id.asc())
            .select(Message::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn update(
        &self,
        message_id: i32,
        changes: UpdateMessage,
    ) -> Result<Message, AppError> {
        use crate::schema::messages::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(messages.filter(id.eq(message_id)))
            .set(&changes)
            .returning(Message::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn delete(&self, message_id: i32) -> Result<usize, AppError> {
        use crate::schema::messages::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(messages.filter(id.eq(message_id)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
