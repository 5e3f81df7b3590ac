use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::models::internal::Image;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub path: String,
    pub extension: String,
    pub conversation_id: Option<String>,
    pub message_id: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::conversations::Entity",
        from = "Column::ConversationId",
        to = "super::conversations::Column::Id"
    )]
    Conversations,
    #[sea_orm(
        belongs_to = "super::messages::Entity",
        from = "Column::MessageId",
        to = "super::messages::Column::Id"
    )]
    Messages,
}

impl Related<super::conversations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Conversations.def()
    }
}

impl Related<super::messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Image {
    fn from(m: Model) -> Self {
        Image {
            id: Uuid::parse_str(&m.id).unwrap_or_default(),
            path: m.path,
            extension: m.extension,
            conversation_id: m
                .conversation_id
                .as_deref()
                .and_then(|v| Uuid::parse_str(v).ok()),
            message_id: m.message_id.as_deref().and_then(|v| Uuid::parse_str(v).ok()),
            created_at: m.created_at,
        }
    }
}
