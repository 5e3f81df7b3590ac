use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::models::internal::Tags;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// JSON array of keyword strings.
    pub tags: Json,
    pub report_summary_id: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::report_summary::Entity",
        from = "Column::ReportSummaryId",
        to = "super::report_summary::Column::Id"
    )]
    ReportSummary,
}

impl Related<super::report_summary::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReportSummary.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn tag_list(&self) -> Vec<String> {
        serde_json::from_value(self.tags.clone()).unwrap_or_default()
    }
}

impl From<Model> for Tags {
    fn from(m: Model) -> Self {
        let tag_list = m.tag_list();
        Tags {
            id: Uuid::parse_str(&m.id).unwrap_or_default(),
            tags: tag_list,
            report_summary_id: Uuid::parse_str(&m.report_summary_id).unwrap_or_default(),
        }
    }
}
