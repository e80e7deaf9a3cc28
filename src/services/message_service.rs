//! Messaging between members.

use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::{Message, NewMessage, UpdateMessage, User};
use crate::query::{MessageContainer, MessageFilter, PageRequest, PagedList, thread};
use crate::repositories::{MessageRepository, PhotoRepository, UserRepository};

/// Display details of one side of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Party {
    pub known_as: String,
    pub photo_url: Option<String>,
}

/// A message with both parties resolved for display.
#[derive(Debug, Clone)]
pub struct MessageView {
    pub message: Message,
    pub sender: Party,
    pub recipient: Party,
}

#[derive(Clone)]
pub struct MessageService {
    messages: MessageRepository,
    users: UserRepository,
    photos: PhotoRepository,
}

impl MessageService {
    pub fn new(
        messages: MessageRepository,
        users: UserRepository,
        photos: PhotoRepository,
    ) -> Self {
        Self {
            messages,
            users,
            photos,
        }
    }

    /// A message `user_id` sent or received.
    pub async fn get_message(&self, user_id: i32, message_id: i32) -> AppResult<MessageView> {
        let message = self.find_involving(user_id, message_id).await?;
        let mut views = self.resolve(vec![message]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::not_found("message", "id", message_id))
    }

    pub async fn list(
        &self,
        user_id: i32,
        container: MessageContainer,
        page: PageRequest,
    ) -> AppResult<PagedList<MessageView>> {
        let all = self.messages.list_involving(user_id).await?;
        let (items, meta) = MessageFilter::new(user_id, container)
            .apply(all, page)
            .into_parts();

        let views = self.resolve(items).await?;
        Ok(PagedList::from_parts(views, meta.total_count, page))
    }

    pub async fn thread(&self, user_id: i32, other_id: i32) -> AppResult<Vec<MessageView>> {
        let exchanged = self.messages.list_between(user_id, other_id).await?;
        self.resolve(thread(user_id, other_id, exchanged)).await
    }

    pub async fn send(
        &self,
        sender_id: i32,
        recipient_id: i32,
        content: String,
    ) -> AppResult<MessageView> {
        if self.users.find_by_id(recipient_id).await?.is_none() {
            return Err(AppError::bad_request("Could not find user"));
        }

        let message = self
            .messages
            .create(NewMessage {
                sender_id,
                recipient_id,
                content,
            })
            .await?;
        tracing::info!(message_id = message.id, sender_id, recipient_id, "Message sent");

        self.get_message(sender_id, message.id).await
    }

    /// Hides the message from `user_id`'s side. Once neither side can see
    /// it the row is removed.
    pub async fn delete(&self, user_id: i32, message_id: i32) -> AppResult<()> {
        let message = self.find_involving(user_id, message_id).await?;

        let mut changes = UpdateMessage::default();
        if message.sender_id == user_id {
            changes.sender_deleted = Some(true);
        }
        if message.recipient_id == user_id {
            changes.recipient_deleted = Some(true);
        }

        let updated = self.messages.update(message_id, changes).await?;
        if updated.is_orphaned() {
            self.messages.delete(message_id).await?;
            tracing::debug!(message_id, "Message removed by both parties");
        }
        Ok(())
    }

    /// Marks the message read. Only its recipient may do so.
    pub async fn mark_read(&self, user_id: i32, message_id: i32) -> AppResult<()> {
        let message = self.find_message(message_id).await?;
        if message.recipient_id != user_id {
            return Err(AppError::unauthorized("Only the recipient can mark a message read"));
        }

        let now = jiff::Timestamp::now()
            .to_zoned(jiff::tz::TimeZone::UTC)
            .datetime();
        self.messages
            .update(
                message_id,
                UpdateMessage {
                    is_read: Some(true),
                    date_read: Some(now.into()),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    async fn find_message(&self, message_id: i32) -> AppResult<Message> {
        self.messages
            .find_by_id(message_id)
            .await?
            .ok_or_else(|| AppError::not_found("message", "id", message_id))
    }

    /// Messages outside the caller's own correspondence read as missing.
    async fn find_involving(&self, user_id: i32, message_id: i32) -> AppResult<Message> {
        let message = self.find_message(message_id).await?;
        if !message.involves(user_id) {
            return Err(AppError::not_found("message", "id", message_id));
        }
        Ok(message)
    }

    async fn resolve(&self, messages: Vec<Message>) -> AppResult<Vec<MessageView>> {
        let mut ids: Vec<i32> = messages
            .iter()
            .flat_map(|message| [message.sender_id, message.recipient_id])
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let users = self.users.find_many(&ids).await?;
        let urls = self.photos.main_urls(&ids).await?;
        let parties = parties(users, urls);

        Ok(messages
            .into_iter()
            .map(|message| MessageView {
                sender: parties.get(&message.sender_id).cloned().unwrap_or_default(),
                recipient: parties
                    .get(&message.recipient_id)
                    .cloned()
                    .unwrap_or_default(),
                message,
            })
            .collect())
    }
}

fn parties(users: Vec<User>, mut urls: HashMap<i32, String>) -> HashMap<i32, Party> {
    users
        .into_iter()
        .map(|user| {
            let party = Party {
                photo_url: urls.remove(&user.id),
                known_as: user.known_as,
            };
            (user.id, party)
        })
        .collect()
}
