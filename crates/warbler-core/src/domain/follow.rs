use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Directed follows edge: `follower_id` follows `followed_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Follow {
    pub follower_id: i32,
    pub followed_id: i32,
}

impl Follow {
    /// Create an edge. A user cannot follow themselves.
    pub fn new(follower_id: i32, followed_id: i32) -> Result<Self, DomainError> {
        if follower_id == followed_id {
            return Err(DomainError::Validation(format!(
                "user {} cannot follow themselves",
                follower_id
            )));
        }

        Ok(Self {
            follower_id,
            followed_id,
        })
    }
}
