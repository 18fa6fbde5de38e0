//! The guestbook, and the bounded log it sits on.

use std::collections::VecDeque;

use chrono::NaiveDateTime;
use log::debug;
use serde::Serialize;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

/// Append-only log of fixed capacity.
///
/// Once full, every append evicts the oldest entry. Services own one of these
/// instead of sharing a process-wide list.
#[derive(Clone, Debug)]
pub struct BoundedLog<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedLog<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an entry, returning the one evicted to make room, if any.
    ///
    /// A zero-capacity log keeps nothing: the entry itself is handed back.
    pub fn push(&mut self, entry: T) -> Option<T> {
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_front()
        } else {
            None
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.entries.iter()
    }

    /// Newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().rev()
    }
}

/// How many messages the board keeps.
pub const BOARD_CAPACITY: usize = 100;

/// Usernames are cut to this many characters.
pub const MAX_USERNAME_CHARS: usize = 50;

/// Messages are cut to this many characters.
pub const MAX_MESSAGE_CHARS: usize = 500;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Message {
    pub username: String,
    pub msg: String,
    pub timestamp: NaiveDateTime,
}

/// The guestbook.
#[derive(Clone, Debug)]
pub struct MessageBoard {
    log: BoundedLog<Message>,
}

impl Default for MessageBoard {
    fn default() -> Self {
        Self::with_capacity(BOARD_CAPACITY)
    }
}

impl MessageBoard {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            log: BoundedLog::new(capacity),
        }
    }

    /// Posts a message.
    ///
    /// Both fields are trimmed and cut to length. Fields that are missing, or
    /// that end up empty, are rejected.
    pub fn post(
        &mut self,
        username: Option<&str>,
        text: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<Message, Error> {
        let username = username.ok_or(Error::MissingField("username"))?;
        let text = text.ok_or(Error::MissingField("message"))?;

        let username = clip(username, MAX_USERNAME_CHARS);
        let msg = clip(text, MAX_MESSAGE_CHARS);

        if username.is_empty() {
            return Err(Error::EmptyField("username"));
        }

        if msg.is_empty() {
            return Err(Error::EmptyField("message"));
        }

        let message = Message {
            username,
            msg,
            timestamp: now,
        };

        if let Some(evicted) = self.log.push(message.clone()) {
            debug!("board full, dropped message from {}", evicted.username);
        }

        Ok(message)
    }

    /// Messages, newest first.
    pub fn list(&self) -> Vec<&Message> {
        self.log.newest_first().collect()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

/// Trims, then keeps at most `max` characters.
pub(crate) fn clip(s: &str, max: usize) -> String {
    s.trim().chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 4)
            .unwrap()
            .and_hms_opt(18, minute, 0)
            .unwrap()
    }

    #[test]
    fn bounded_log_evicts_oldest() {
        let mut log = BoundedLog::new(3);
        assert_eq!(log.push(1), None);
        assert_eq!(log.push(2), None);
        assert_eq!(log.push(3), None);
        assert_eq!(log.push(4), Some(1));

        assert_eq!(log.len(), 3);
        assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(log.newest_first().copied().collect::<Vec<_>>(), vec![4, 3, 2]);
        assert_eq!(log.last(), Some(&4));
    }

    #[test]
    fn zero_capacity_log_keeps_nothing() {
        let mut log = BoundedLog::new(0);
        assert_eq!(log.push("hello"), Some("hello"));
        assert!(log.is_empty());
    }

    #[test]
    fn posts_and_lists_newest_first() {
        let mut board = MessageBoard::default();
        board.post(Some("IZ1ABC"), Some("CQ CQ"), at(0)).unwrap();
        board.post(Some("IK2XYZ"), Some("73!"), at(1)).unwrap();

        let list = board.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].username, "IK2XYZ");
        assert_eq!(list[1].msg, "CQ CQ");
        assert_eq!(list[1].timestamp, at(0));
    }

    #[test]
    fn trims_and_clips_fields() {
        let mut board = MessageBoard::default();
        let long_name = "x".repeat(80);
        let long_text = "è".repeat(600);

        let msg = board
            .post(Some(&format!("  {}  ", long_name)), Some(&long_text), at(0))
            .unwrap();
        assert_eq!(msg.username.chars().count(), MAX_USERNAME_CHARS);
        assert_eq!(msg.msg.chars().count(), MAX_MESSAGE_CHARS);

        let msg = board.post(Some(" IW3DEF "), Some(" ciao "), at(1)).unwrap();
        assert_eq!(msg.username, "IW3DEF");
        assert_eq!(msg.msg, "ciao");
    }

    #[test]
    fn rejects_missing_and_blank_fields() {
        let mut board = MessageBoard::default();
        assert_eq!(
            board.post(None, Some("hi"), at(0)).unwrap_err(),
            Error::MissingField("username")
        );
        assert_eq!(
            board.post(Some("IZ1ABC"), None, at(0)).unwrap_err(),
            Error::MissingField("message")
        );
        assert_eq!(
            board.post(Some("   "), Some("hi"), at(0)).unwrap_err(),
            Error::EmptyField("username")
        );
        assert_eq!(
            board.post(Some("IZ1ABC"), Some("\n\t"), at(0)).unwrap_err(),
            Error::EmptyField("message")
        );
        assert!(board.is_empty());
    }

    #[test]
    fn keeps_the_last_hundred() {
        let mut board = MessageBoard::default();
        for i in 0..120 {
            board
                .post(Some("IZ1ABC"), Some(&format!("msg {}", i)), at(i % 60))
                .unwrap();
        }

        let list = board.list();
        assert_eq!(list.len(), BOARD_CAPACITY);
        assert_eq!(list[0].msg, "msg 119");
        assert_eq!(list[BOARD_CAPACITY - 1].msg, "msg 20");
    }
}
