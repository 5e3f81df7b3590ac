use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::models::internal::Emotion;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "emotion")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub total_score: i32,
    pub comfortable_score: i32,
    pub happy_score: i32,
    pub sad_score: i32,
    pub joyful_score: i32,
    pub annoyed_score: i32,
    pub lethargic_score: i32,
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

impl From<Model> for Emotion {
    fn from(m: Model) -> Self {
        Emotion {
            id: Uuid::parse_str(&m.id).unwrap_or_default(),
            total_score: m.total_score,
            comfortable_score: m.comfortable_score,
            happy_score: m.happy_score,
            sad_score: m.sad_score,
            joyful_score: m.joyful_score,
            annoyed_score: m.annoyed_score,
            lethargic_score: m.lethargic_score,
        }
    }
}
