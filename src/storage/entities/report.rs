use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::models::internal::Report;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub conversation_id: String,
    pub snowflake_id: i64,
    pub emotion_id: String,
    pub report_summary_id: String,
    pub drawing_diary_id: Option<String>,
    pub created_at: DateTime,
    pub deleted_at: Option<DateTime>,
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
        belongs_to = "super::emotion::Entity",
        from = "Column::EmotionId",
        to = "super::emotion::Column::Id"
    )]
    Emotion,
    #[sea_orm(
        belongs_to = "super::report_summary::Entity",
        from = "Column::ReportSummaryId",
        to = "super::report_summary::Column::Id"
    )]
    ReportSummary,
    #[sea_orm(
        belongs_to = "super::drawing_diary::Entity",
        from = "Column::DrawingDiaryId",
        to = "super::drawing_diary::Column::Id"
    )]
    DrawingDiary,
}

impl Related<super::conversations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Conversations.def()
    }
}

impl Related<super::emotion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Emotion.def()
    }
}

impl Related<super::report_summary::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReportSummary.def()
    }
}

impl Related<super::drawing_diary::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DrawingDiary.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Report {
    fn from(m: Model) -> Self {
        Report {
            id: Uuid::parse_str(&m.id).unwrap_or_default(),
            conversation_id: Uuid::parse_str(&m.conversation_id).unwrap_or_default(),
            snowflake_id: m.snowflake_id,
            emotion_id: Uuid::parse_str(&m.emotion_id).unwrap_or_default(),
            report_summary_id: Uuid::parse_str(&m.report_summary_id).unwrap_or_default(),
            drawing_diary_id: m
                .drawing_diary_id
                .as_deref()
                .and_then(|v| Uuid::parse_str(v).ok()),
            created_at: m.created_at,
        }
    }
}
