//! Message containers and conversation threads.

use std::cmp::Reverse;

use jiff::civil::DateTime;

use super::page::{PageRequest, PagedList};
use super::pipeline::Pipeline;

/// The fields of a message the inbox pipeline looks at.
pub trait Correspondence {
    fn message_id(&self) -> i32;
    fn sender_id(&self) -> i32;
    fn recipient_id(&self) -> i32;
    fn is_read(&self) -> bool;
    fn sender_deleted(&self) -> bool;
    fn recipient_deleted(&self) -> bool;
    fn sent_at(&self) -> DateTime;
}

/// Which side of the mailbox to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageContainer {
    Inbox,
    Outbox,
    /// Inbox messages not yet read.
    #[default]
    Unread,
}

impl MessageContainer {
    /// Case-insensitive; anything unrecognized is [`MessageContainer::Unread`].
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("inbox") => Self::Inbox,
            Some(value) if value.eq_ignore_ascii_case("outbox") => Self::Outbox,
            _ => Self::Unread,
        }
    }

    pub fn contains<M: Correspondence>(&self, user_id: i32, message: &M) -> bool {
        let received = message.recipient_id() == user_id && !message.recipient_deleted();

        match self {
            Self::Inbox => received,
            Self::Outbox => message.sender_id() == user_id && !message.sender_deleted(),
            Self::Unread => received && !message.is_read(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageFilter {
    pub user_id: i32,
    pub container: MessageContainer,
}

impl MessageFilter {
    pub fn new(user_id: i32, container: MessageContainer) -> Self {
        Self { user_id, container }
    }

    /// Container filter, newest first, then paging.
    pub fn apply<M: Correspondence>(&self, messages: Vec<M>, page: PageRequest) -> PagedList<M> {
        Pipeline::new(messages)
            .filter(|message| self.container.contains(self.user_id, message))
            .sort_by_key_desc(|message| (message.sent_at(), Reverse(message.message_id())))
            .page(page)
    }
}

/// The conversation between `user_id` and `other_id`, oldest first.
///
/// Messages `user_id` has deleted on their side are left out.
pub fn thread<M: Correspondence>(user_id: i32, other_id: i32, messages: Vec<M>) -> Vec<M> {
    Pipeline::new(messages)
        .filter(|message| {
            let received = message.sender_id() == other_id
                && message.recipient_id() == user_id
                && !message.recipient_deleted();
            let sent = message.sender_id() == user_id
                && message.recipient_id() == other_id
                && !message.sender_deleted();
            received || sent
        })
        .sort_by_key_asc(|message| (message.sent_at(), message.message_id()))
        .into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[derive(Debug, Clone, Default)]
    struct Note {
        id: i32,
        from: i32,
        to: i32,
        read: bool,
        from_deleted: bool,
        to_deleted: bool,
        hour: i8,
    }

    impl Correspondence for Note {
        fn message_id(&self) -> i32 {
            self.id
        }
        fn sender_id(&self) -> i32 {
            self.from
        }
        fn recipient_id(&self) -> i32 {
            self.to
        }
        fn is_read(&self) -> bool {
            self.read
        }
        fn sender_deleted(&self) -> bool {
            self.from_deleted
        }
        fn recipient_deleted(&self) -> bool {
            self.to_deleted
        }
        fn sent_at(&self) -> DateTime {
            date(2024, 3, 1).at(self.hour, 0, 0, 0)
        }
    }

    fn note(id: i32, from: i32, to: i32, hour: i8) -> Note {
        Note {
            id,
            from,
            to,
            hour,
            ..Default::default()
        }
    }

    fn mailbox() -> Vec<Note> {
        vec![
            note(1, 2, 1, 8),
            Note { read: true, ..note(2, 2, 1, 9) },
            note(3, 1, 2, 10),
            Note { to_deleted: true, ..note(4, 3, 1, 11) },
            Note { from_deleted: true, ..note(5, 1, 3, 12) },
            note(6, 3, 1, 13),
            note(7, 2, 3, 14),
        ]
    }

    fn ids(notes: &[Note]) -> Vec<i32> {
        notes.iter().map(|note| note.id).collect()
    }

    #[test]
    fn test_container_parse() {
        assert_eq!(MessageContainer::parse(Some("Inbox")), MessageContainer::Inbox);
        assert_eq!(MessageContainer::parse(Some("OUTBOX")), MessageContainer::Outbox);
        assert_eq!(MessageContainer::parse(Some("unread")), MessageContainer::Unread);
        assert_eq!(MessageContainer::parse(Some("archive")), MessageContainer::Unread);
        assert_eq!(MessageContainer::parse(None), MessageContainer::Unread);
    }

    #[test]
    fn test_inbox_skips_deleted_and_orders_newest_first() {
        let filter = MessageFilter::new(1, MessageContainer::Inbox);
        let page = filter.apply(mailbox(), PageRequest::default());

        assert_eq!(ids(page.items()), vec![6, 2, 1]);
        assert_eq!(page.meta().total_count, 3);
    }

    #[test]
    fn test_outbox() {
        let filter = MessageFilter::new(1, MessageContainer::Outbox);
        let page = filter.apply(mailbox(), PageRequest::default());

        assert_eq!(ids(page.items()), vec![3]);
    }

    #[test]
    fn test_unread_is_default() {
        let filter = MessageFilter::new(1, MessageContainer::parse(None));
        let page = filter.apply(mailbox(), PageRequest::default());

        assert_eq!(ids(page.items()), vec![6, 1]);
    }

    #[test]
    fn test_inbox_paging() {
        let filter = MessageFilter::new(1, MessageContainer::Inbox);
        let page = filter.apply(mailbox(), PageRequest::new(2, 2));

        assert_eq!(ids(page.items()), vec![1]);
        assert_eq!(page.meta().total_pages, 2);
    }

    #[test]
    fn test_thread_is_chronological_and_two_sided() {
        let conversation = thread(1, 2, mailbox());
        assert_eq!(ids(&conversation), vec![1, 2, 3]);

        let conversation = thread(1, 3, mailbox());
        assert_eq!(ids(&conversation), vec![6]);

        let conversation = thread(3, 1, mailbox());
        assert_eq!(ids(&conversation), vec![4, 5, 6]);
    }

    #[test]
    fn test_same_second_messages_keep_a_fixed_order() {
        let burst: Vec<Note> = (1..=5).map(|id| note(id, 2, 1, 9)).collect();
        let mut reloaded = burst.clone();
        reloaded.reverse();
        reloaded.swap(1, 3);

        let filter = MessageFilter::new(1, MessageContainer::Inbox);
        let pages = |notes: Vec<Note>| -> Vec<i32> {
            (1..=3)
                .flat_map(|number| {
                    ids(filter.apply(notes.clone(), PageRequest::new(number, 2)).items())
                })
                .collect()
        };
        assert_eq!(pages(burst.clone()), vec![5, 4, 3, 2, 1]);
        assert_eq!(pages(reloaded.clone()), vec![5, 4, 3, 2, 1]);

        assert_eq!(ids(&thread(1, 2, reloaded)), vec![1, 2, 3, 4, 5]);
    }
}
