//! Follows join entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use warbler_core::domain::Follow;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "follows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_being_followed_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_following_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The user being followed.
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserBeingFollowedId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Followed,
    /// The user doing the following.
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserFollowingId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Follower,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Follow {
    fn from(model: Model) -> Self {
        Self {
            follower_id: model.user_following_id,
            followed_id: model.user_being_followed_id,
        }
    }
}

impl From<Follow> for ActiveModel {
    fn from(follow: Follow) -> Self {
        Self {
            user_being_followed_id: Set(follow.followed_id),
            user_following_id: Set(follow.follower_id),
        }
    }
}
