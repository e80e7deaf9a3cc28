//! Message DTOs.

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::query::{MessageContainer, PageRequest};
use crate::services::MessageView;

/// Inbox listing parameters, read leniently like [`super::UserListQuery`].
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MessageListQuery {
    #[param(example = "1")]
    pub page_number: Option<String>,
    #[param(example = "10")]
    pub page_size: Option<String>,
    /// `Inbox`, `Outbox` or `Unread` (default)
    #[param(example = "Inbox")]
    pub message_container: Option<String>,
}

impl MessageListQuery {
    pub fn page(&self) -> PageRequest {
        PageRequest::from_raw(self.page_number.as_deref(), self.page_size.as_deref())
    }

    pub fn container(&self) -> MessageContainer {
        MessageContainer::parse(self.message_container.as_deref())
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    #[schema(example = 3)]
    pub recipient_id: i32,
    #[validate(length(min = 1, max = 4000, message = "Message content cannot be empty"))]
    #[schema(example = "Hi there")]
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: i32,
    pub sender_id: i32,
    pub sender_known_as: String,
    pub sender_photo_url: Option<String>,
    pub recipient_id: i32,
    pub recipient_known_as: String,
    pub recipient_photo_url: Option<String>,
    pub content: String,
    pub is_read: bool,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub date_read: Option<DateTime>,
    #[schema(value_type = String, format = DateTime)]
    pub message_sent: DateTime,
}

impl From<MessageView> for MessageResponse {
    fn from(view: MessageView) -> Self {
        let message = view.message;
        Self {
            id: message.id,
            sender_id: message.sender_id,
            sender_known_as: view.sender.known_as,
            sender_photo_url: view.sender.photo_url,
            recipient_id: message.recipient_id,
            recipient_known_as: view.recipient.known_as,
            recipient_photo_url: view.recipient.photo_url,
            content: message.content,
            is_read: message.is_read,
            date_read: message.date_read.map(|read| read.to_jiff()),
            message_sent: message.message_sent.to_jiff(),
        }
    }
}
