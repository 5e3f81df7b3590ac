use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::models::internal::DrawingDiary;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "drawing_diary")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub image_url: String,
    pub image_title: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::report::Entity")]
    Report,
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Report.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DrawingDiary {
    fn from(m: Model) -> Self {
        DrawingDiary {
            id: Uuid::parse_str(&m.id).unwrap_or_default(),
            image_url: m.image_url,
            image_title: m.image_title,
        }
    }
}
