use diesel::prelude::*;
use jiff::civil::DateTime as CivilDateTime;
use jiff_diesel::DateTime;

use crate::query::Correspondence;

#[derive(Debug, Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::schema::messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Message {
    pub id: i32,
    pub sender_id: i32,
    pub recipient_id: i32,
    pub content: String,
    pub is_read: bool,
    pub date_read: Option<DateTime>,
    pub message_sent: DateTime,
    pub sender_deleted: bool,
    pub recipient_deleted: bool,
}

impl Message {
    pub fn involves(&self, user_id: i32) -> bool {
        self.sender_id == user_id || self.recipient_id == user_id
    }

    /// Whether both sides have deleted the message.
    pub fn is_orphaned(&self) -> bool {
        self.sender_deleted && self.recipient_deleted
    }
}

impl Correspondence for Message {
    fn message_id(&self) -> i32 {
        self.id
    }

    fn sender_id(&self) -> i32 {
        self.sender_id
    }

    fn recipient_id(&self) -> i32 {
        self.recipient_id
    }

    fn is_read(&self) -> bool {
        self.is_read
    }

    fn sender_deleted(&self) -> bool {
        self.sender_deleted
    }

    fn recipient_deleted(&self) -> bool {
        self.recipient_deleted
    }

    fn sent_at(&self) -> CivilDateTime {
        self.message_sent.to_jiff()
    }
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::messages)]
pub struct NewMessage {
    pub sender_id: i32,
    pub recipient_id: i32,
    pub content: String,
}

/// Flags changed when one side deletes or reads a message
#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::messages)]
pub struct UpdateMessage {
    pub is_read: Option<bool>,
    pub date_read: Option<DateTime>,
    pub sender_deleted: Option<bool>,
    pub recipient_deleted: Option<bool>,
}
