use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{User, UserId};

/// Unique identifier for a message (a uuid on the wire).
pub type MessageId = String;

/// A chat message exchanged between the two parties of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    /// Absent when the sender's profile was not included in the response.
    #[serde(default)]
    pub sender: Option<User>,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl Message {
    /// True when the message was sent by `viewer`. Unknown senders are never the viewer.
    pub fn is_sent_by(&self, viewer: &UserId) -> bool {
        self.sender.as_ref().is_some_and(|s| &s.id == viewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sender_is_nobody() {
        let msg: Message = serde_json::from_str(
            r#"{"id":"m1","content":"hi","at":"2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert!(msg.sender.is_none());
        assert!(!msg.is_sent_by(&UserId::from("u1")));
    }

    #[test]
    fn sender_matches_by_id() {
        let msg = Message {
            id: "m1".into(),
            sender: Some(User::new("u1", "Ada")),
            content: "hi".into(),
            at: Utc::now(),
        };
        assert!(msg.is_sent_by(&UserId::from("u1")));
        assert!(!msg.is_sent_by(&UserId::from("u2")));
    }
}
