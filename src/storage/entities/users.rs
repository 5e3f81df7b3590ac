use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::models::internal::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub nickname: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub deleted_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::conversations::Entity")]
    Conversations,
    #[sea_orm(has_one = "super::lemons::Entity")]
    Lemons,
}

impl Related<super::conversations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Conversations.def()
    }
}

impl Related<super::lemons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lemons.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(m: Model) -> Self {
        User {
            id: Uuid::parse_str(&m.id).unwrap_or_default(),
            nickname: m.nickname,
            created_at: m.created_at,
            deleted_at: m.deleted_at,
        }
    }
}
