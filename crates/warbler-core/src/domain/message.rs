use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Longest message text, in characters.
pub const MAX_MESSAGE_LEN: usize = 140;

/// Message entity - a short post owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i32,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: i32,
}

/// An unsaved message, staged through a unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: i32,
}

impl NewMessage {
    /// Create a message stamped with the current time.
    ///
    /// The owner is only checked by the store when the message is committed.
    pub fn new(text: impl Into<String>, user_id: i32) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::Validation("message text is required".to_string()));
        }
        let len = text.chars().count();
        if len > MAX_MESSAGE_LEN {
            return Err(DomainError::Validation(format!(
                "message text is {} characters, the limit is {}",
                len, MAX_MESSAGE_LEN
            )));
        }

        Ok(Self {
            text,
            // Postgres keeps microseconds
            timestamp: Utc::now().trunc_subsecs(6),
            user_id,
        })
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_message_defaults_timestamp() {
        let before = Utc::now().trunc_subsecs(6);
        let message = NewMessage::new("This is a text message!", 1111).unwrap();

        assert_eq!(message.user_id, 1111);
        assert!(message.timestamp >= before);
        assert_eq!(message.timestamp.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_explicit_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let message = NewMessage::new("hello", 1).unwrap().with_timestamp(at);
        assert_eq!(message.timestamp, at);
    }

    #[test]
    fn test_text_bounds() {
        assert!(matches!(NewMessage::new("", 1), Err(DomainError::Validation(_))));
        assert!(matches!(NewMessage::new("   ", 1), Err(DomainError::Validation(_))));

        let longest = "é".repeat(MAX_MESSAGE_LEN);
        assert!(NewMessage::new(longest, 1).is_ok());

        let too_long = "x".repeat(MAX_MESSAGE_LEN + 1);
        assert!(matches!(NewMessage::new(too_long, 1), Err(DomainError::Validation(_))));
    }
}
