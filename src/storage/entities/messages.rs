use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::models::internal::ChatMessage;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub conversation_id: String,
    pub idx: i32,
    pub is_from_user: bool,
    pub content: Option<String>,
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
    #[sea_orm(has_many = "super::images::Entity")]
    Images,
}

impl Related<super::conversations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Conversations.def()
    }
}

impl Related<super::images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ChatMessage {
    fn from(m: Model) -> Self {
        ChatMessage {
            id: Uuid::parse_str(&m.id).unwrap_or_default(),
            conversation_id: Uuid::parse_str(&m.conversation_id).unwrap_or_default(),
            idx: m.idx,
            is_from_user: m.is_from_user,
            content: m.content,
            created_at: m.created_at,
        }
    }
}
