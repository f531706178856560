//! SeaORM repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};

use warbler_core::RepoError;
use warbler_core::domain::{Message, User, UserRelations};
use warbler_core::ports::{MessageRepository, UserRepository};

use super::base::SeaOrmRepository;
use super::entity::follows::{self, Entity as FollowsEntity};
use super::entity::message::{self, Entity as MessageEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::errors::map_db_err;

/// SeaORM user repository.
pub type SeaOrmUserRepository = SeaOrmRepository<UserEntity>;

/// SeaORM message repository.
pub type SeaOrmMessageRepository = SeaOrmRepository<MessageEntity>;

/// Mask an email address so it can be logged without leaking PII.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{}***", first),
                _ => "***".to_string(),
            };
            format!("{}@{}", masked_local, domain)
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn followers(&self, user_id: i32) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .join(JoinType::InnerJoin, follows::Relation::Follower.def().rev())
            .filter(follows::Column::UserBeingFollowedId.eq(user_id))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn following(&self, user_id: i32) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .join(JoinType::InnerJoin, follows::Relation::Followed.def().rev())
            .filter(follows::Column::UserFollowingId.eq(user_id))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn is_following(&self, follower_id: i32, followed_id: i32) -> Result<bool, RepoError> {
        // Key order is (user_being_followed_id, user_following_id).
        let edge = FollowsEntity::find_by_id((followed_id, follower_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(edge.is_some())
    }

    async fn load_relations(&self, user_id: i32) -> Result<Option<UserRelations>, RepoError> {
        let Some(found) = UserEntity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let messages_repo = SeaOrmMessageRepository::new(self.db.clone());
        let (messages, followers, following) = futures::try_join!(
            messages_repo.find_by_user_id(user_id),
            self.followers(user_id),
            self.following(user_id),
        )?;

        Ok(Some(UserRelations {
            user: found.into(),
            messages,
            followers,
            following,
        }))
    }
}

#[async_trait]
impl MessageRepository for SeaOrmMessageRepository {
    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Message>, RepoError> {
        let result = MessageEntity::find()
            .filter(message::Column::UserId.eq(user_id))
            .order_by_desc(message::Column::Timestamp)
            .order_by_desc(message::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_by_user_id(&self, user_id: i32) -> Result<u64, RepoError> {
        MessageEntity::find()
            .filter(message::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn home_timeline(&self, user_id: i32, limit: u64) -> Result<Vec<Message>, RepoError> {
        let mut authors: Vec<i32> = FollowsEntity::find()
            .filter(follows::Column::UserFollowingId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|edge| edge.user_being_followed_id)
            .collect();
        authors.push(user_id);

        tracing::debug!(user_id, authors = authors.len(), "Loading home timeline");

        let result = MessageEntity::find()
            .filter(message::Column::UserId.is_in(authors))
            .order_by_desc(message::Column::Timestamp)
            .order_by_desc(message::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
