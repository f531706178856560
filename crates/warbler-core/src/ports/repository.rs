use async_trait::async_trait;

use crate::domain::{Message, User, UserRelations};
use crate::error::RepoError;

/// Generic repository trait defining the read operations shared by all entities.
///
/// Writes go through a [`UnitOfWork`](super::UnitOfWork).
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// List every entity, ordered by primary key.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Users following `user_id`.
    async fn followers(&self, user_id: i32) -> Result<Vec<User>, RepoError>;

    /// Users that `user_id` follows.
    async fn following(&self, user_id: i32) -> Result<Vec<User>, RepoError>;

    /// Whether a follows edge `follower_id -> followed_id` exists.
    async fn is_following(&self, follower_id: i32, followed_id: i32) -> Result<bool, RepoError>;

    /// Load a user together with its messages, followers and followed users.
    async fn load_relations(&self, user_id: i32) -> Result<Option<UserRelations>, RepoError>;
}

/// Message repository.
#[async_trait]
pub trait MessageRepository: BaseRepository<Message, i32> {
    /// Messages authored by `user_id`, newest first.
    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Message>, RepoError>;

    async fn count_by_user_id(&self, user_id: i32) -> Result<u64, RepoError>;

    /// Newest messages written by `user_id` or by anyone `user_id` follows.
    async fn home_timeline(&self, user_id: i32, limit: u64) -> Result<Vec<Message>, RepoError>;
}
