//! Message entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use warbler_core::domain::{Message, NewMessage};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub text: String,
    pub timestamp: DateTimeWithTimeZone,
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Message.
impl From<Model> for Message {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            text: model.text,
            timestamp: model.timestamp.into(),
            user_id: model.user_id,
        }
    }
}

/// Conversion from an unsaved Domain Message to SeaORM ActiveModel.
impl From<NewMessage> for ActiveModel {
    fn from(message: NewMessage) -> Self {
        Self {
            id: sea_orm::NotSet,
            text: Set(message.text),
            timestamp: Set(message.timestamp.into()),
            user_id: Set(message.user_id),
        }
    }
}
