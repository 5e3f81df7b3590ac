use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    prelude::*, Condition, JoinType, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::models::internal::{
    DailyScore, DrawingDiary, Emotion, EmotionScores, Report, ReportListItem, ReportSummary,
    ReportView,
};
use crate::storage::entities::{
    conversations, drawing_diary, emotion, lemons, report, report_summary, tags,
};
use crate::storage::snowflake::SnowflakeGenerator;
use crate::storage::{map_insert_err, RepositoryError};

/// Everything the extraction pipeline produced for one conversation.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub summary: String,
    pub keywords: Vec<String>,
    pub sentiment: i32,
    pub scores: EmotionScores,
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Persists summary, tags, emotion and report in one transaction and
    /// debits one lemon from the owning user. Nothing is written when any
    /// step fails; a second report for the same conversation fails with
    /// `Duplicate`, a zero balance with `Exhausted`.
    async fn create_report(&self, new: NewReport) -> Result<Report, RepositoryError>;

    async fn find_by_conversation_id(
        &self,
        conversation_id: Uuid,
    ) -> Result<Option<ReportView>, RepositoryError>;

    async fn find_by_report_id(
        &self,
        report_id: Uuid,
    ) -> Result<Option<ReportView>, RepositoryError>;

    /// Stores a generated illustration and points the conversation's report
    /// at it. The report must already exist.
    async fn attach_drawing_diary(
        &self,
        conversation_id: Uuid,
        image_url: &str,
        image_title: &str,
    ) -> Result<DrawingDiary, RepositoryError>;

    /// Reports whose tag list contains any of `tokens` (exact element match),
    /// newest first, continuing strictly below `cursor` when supplied.
    async fn search(
        &self,
        tokens: &[String],
        limit: u64,
        cursor: Option<i64>,
    ) -> Result<Vec<ReportListItem>, RepositoryError>;

    async fn list_monthly(
        &self,
        year: i32,
        month: u32,
        limit: u64,
        cursor: Option<i64>,
    ) -> Result<Vec<ReportListItem>, RepositoryError>;

    /// Emotion totals for the user's reports inside the inclusive 7-day
    /// window ending at `target_date`, oldest first. Days without a report
    /// are absent, a report without an emotion row scores 0.
    async fn weekly_scores(
        &self,
        user_id: Uuid,
        target_date: NaiveDate,
    ) -> Result<Vec<DailyScore>, RepositoryError>;
}

pub struct SeaOrmReportRepository {
    db: DatabaseConnection,
    snowflakes: Arc<SnowflakeGenerator>,
}

impl SeaOrmReportRepository {
    pub fn new(db: DatabaseConnection, snowflakes: Arc<SnowflakeGenerator>) -> Self {
        Self { db, snowflakes }
    }

    async fn load_view(&self, model: report::Model) -> Result<ReportView, RepositoryError> {
        let summary_model = report_summary::Entity::find_by_id(model.report_summary_id.clone())
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                RepositoryError::NotFound(format!(
                    "Report summary not found: {}",
                    model.report_summary_id
                ))
            })?;

        let tag_rows = tags::Entity::find()
            .filter(tags::Column::ReportSummaryId.eq(model.report_summary_id.clone()))
            .order_by_asc(tags::Column::CreatedAt)
            .all(&self.db)
            .await?;
        let tag_list: Vec<String> = tag_rows.iter().flat_map(|t| t.tag_list()).collect();

        let emotion_model = emotion::Entity::find_by_id(model.emotion_id.clone())
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("Emotion not found: {}", model.emotion_id))
            })?;

        let diary = match &model.drawing_diary_id {
            Some(id) => drawing_diary::Entity::find_by_id(id.clone())
                .one(&self.db)
                .await?
                .map(DrawingDiary::from),
            None => None,
        };

        Ok(ReportView {
            report: Report::from(model),
            summary: ReportSummary::from(summary_model),
            tags: tag_list,
            emotion: Emotion::from(emotion_model),
            drawing_diary: diary,
        })
    }

    /// Resolves summaries, tags and thumbnails for a page of report rows.
    async fn hydrate_list_items(
        &self,
        rows: Vec<report::Model>,
    ) -> Result<Vec<ReportListItem>, RepositoryError> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let summary_ids: Vec<String> = rows.iter().map(|r| r.report_summary_id.clone()).collect();
        let diary_ids: Vec<String> = rows
            .iter()
            .filter_map(|r| r.drawing_diary_id.clone())
            .collect();

        let summaries: HashMap<String, String> = report_summary::Entity::find()
            .filter(report_summary::Column::Id.is_in(summary_ids.clone()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| (m.id, m.contents))
            .collect();

        let mut tags_by_summary: HashMap<String, Vec<String>> = HashMap::new();
        let tag_rows = tags::Entity::find()
            .filter(tags::Column::ReportSummaryId.is_in(summary_ids))
            .order_by_asc(tags::Column::CreatedAt)
            .all(&self.db)
            .await?;
        for row in tag_rows {
            let list = row.tag_list();
            tags_by_summary
                .entry(row.report_summary_id)
                .or_default()
                .extend(list);
        }

        let thumbnails: HashMap<String, String> = if diary_ids.is_empty() {
            HashMap::new()
        } else {
            drawing_diary::Entity::find()
                .filter(drawing_diary::Column::Id.is_in(diary_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|m| (m.id, m.image_url))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|r| ReportListItem {
                report_id: Uuid::parse_str(&r.id).unwrap_or_default(),
                conversation_id: Uuid::parse_str(&r.conversation_id).unwrap_or_default(),
                snowflake_id: r.snowflake_id,
                tags: tags_by_summary
                    .get(&r.report_summary_id)
                    .cloned()
                    .unwrap_or_default(),
                ai_summary: summaries.get(&r.report_summary_id).cloned().unwrap_or_default(),
                thumbnail: r
                    .drawing_diary_id
                    .as_ref()
                    .and_then(|id| thumbnails.get(id).cloned()),
                created_at: r.created_at,
            })
            .collect())
    }

    fn page_query(cursor: Option<i64>, limit: u64) -> Select<report::Entity> {
        let mut query = report::Entity::find().filter(report::Column::DeletedAt.is_null());
        if let Some(c) = cursor {
            query = query.filter(report::Column::SnowflakeId.lt(c));
        }
        query
            .order_by_desc(report::Column::SnowflakeId)
            .limit(limit)
    }
}

#[async_trait]
impl ReportRepository for SeaOrmReportRepository {
    async fn create_report(&self, new: NewReport) -> Result<Report, RepositoryError> {
        let now = chrono::Utc::now().naive_utc();
        let txn = self.db.begin().await?;

        let summary = report_summary::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            contents: Set(new.summary),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        tags::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            tags: Set(serde_json::json!(new.keywords)),
            report_summary_id: Set(summary.id.clone()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let emotion_row = emotion::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            total_score: Set(new.sentiment),
            comfortable_score: Set(new.scores.comfortable),
            happy_score: Set(new.scores.happy),
            sad_score: Set(new.scores.sad),
            joyful_score: Set(new.scores.joyful),
            annoyed_score: Set(new.scores.annoyed),
            lethargic_score: Set(new.scores.lethargic),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let report_model = report::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            conversation_id: Set(new.conversation_id.to_string()),
            snowflake_id: Set(self.snowflakes.next_id()),
            emotion_id: Set(emotion_row.id.clone()),
            report_summary_id: Set(summary.id.clone()),
            drawing_diary_id: Set(None),
            created_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| map_insert_err(e, "Report for this conversation"))?;

        let lemon = lemons::Entity::find()
            .filter(lemons::Column::UserId.eq(new.user_id.to_string()))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                RepositoryError::NotFound(format!(
                    "Lemon balance not found for user: {}",
                    new.user_id
                ))
            })?;

        if lemon.lemon_count <= 0 {
            return Err(RepositoryError::Exhausted(
                "No lemons left to spend on a report".to_string(),
            ));
        }

        let remaining = lemon.lemon_count - 1;
        let mut lemon_active: lemons::ActiveModel = lemon.into();
        lemon_active.lemon_count = Set(remaining);
        lemon_active.updated_at = Set(now);
        lemon_active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(
            "Created report {} for conversation {}",
            report_model.id,
            report_model.conversation_id
        );

        Ok(Report::from(report_model))
    }

    async fn find_by_conversation_id(
        &self,
        conversation_id: Uuid,
    ) -> Result<Option<ReportView>, RepositoryError> {
        let model = report::Entity::find()
            .filter(report::Column::ConversationId.eq(conversation_id.to_string()))
            .filter(report::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        match model {
            Some(m) => Ok(Some(self.load_view(m).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_report_id(
        &self,
        report_id: Uuid,
    ) -> Result<Option<ReportView>, RepositoryError> {
        let model = report::Entity::find_by_id(report_id.to_string())
            .filter(report::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        match model {
            Some(m) => Ok(Some(self.load_view(m).await?)),
            None => Ok(None),
        }
    }

    async fn attach_drawing_diary(
        &self,
        conversation_id: Uuid,
        image_url: &str,
        image_title: &str,
    ) -> Result<DrawingDiary, RepositoryError> {
        let now = chrono::Utc::now().naive_utc();
        let txn = self.db.begin().await?;

        let report_model = report::Entity::find()
            .filter(report::Column::ConversationId.eq(conversation_id.to_string()))
            .filter(report::Column::DeletedAt.is_null())
            .one(&txn)
            .await?
            .ok_or_else(|| {
                RepositoryError::NotFound(format!(
                    "Report not found for conversation: {conversation_id}"
                ))
            })?;

        let diary = drawing_diary::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            image_url: Set(image_url.to_string()),
            image_title: Set(image_title.to_string()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut active: report::ActiveModel = report_model.into();
        active.drawing_diary_id = Set(Some(diary.id.clone()));
        active.update(&txn).await?;

        txn.commit().await?;

        Ok(DrawingDiary::from(diary))
    }

    async fn search(
        &self,
        tokens: &[String],
        limit: u64,
        cursor: Option<i64>,
    ) -> Result<Vec<ReportListItem>, RepositoryError> {
        if tokens.is_empty() {
            return Ok(vec![]);
        }

        // A tag list is stored as a JSON array, so an exact element match is
        // a LIKE against the element's JSON string form. OR across tokens.
        let mut token_cond = Condition::any();
        for token in tokens {
            let literal = serde_json::to_string(token).unwrap_or_default();
            let pattern = format!("%{}%", escape_like(&literal));
            token_cond = token_cond.add(
                tags::Column::Tags.like(LikeExpr::new(pattern).escape('!')),
            );
        }

        let tag_rows = tags::Entity::find().filter(token_cond).all(&self.db).await?;

        let mut summary_ids: Vec<String> = Vec::new();
        for row in tag_rows {
            if !summary_ids.contains(&row.report_summary_id) {
                summary_ids.push(row.report_summary_id);
            }
        }
        if summary_ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = Self::page_query(cursor, limit)
            .filter(report::Column::ReportSummaryId.is_in(summary_ids))
            .all(&self.db)
            .await?;

        self.hydrate_list_items(rows).await
    }

    async fn list_monthly(
        &self,
        year: i32,
        month: u32,
        limit: u64,
        cursor: Option<i64>,
    ) -> Result<Vec<ReportListItem>, RepositoryError> {
        let start_date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            RepositoryError::InvalidInput(format!("Invalid year/month: {year}-{month}"))
        })?;
        let end_date = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| {
            RepositoryError::InvalidInput(format!("Invalid year/month: {year}-{month}"))
        })?;

        let start = start_date.and_time(NaiveTime::MIN);
        let end = end_date.and_time(NaiveTime::MIN);

        let rows = Self::page_query(cursor, limit)
            .filter(report::Column::CreatedAt.gte(start))
            .filter(report::Column::CreatedAt.lt(end))
            .all(&self.db)
            .await?;

        self.hydrate_list_items(rows).await
    }

    async fn weekly_scores(
        &self,
        user_id: Uuid,
        target_date: NaiveDate,
    ) -> Result<Vec<DailyScore>, RepositoryError> {
        let window_start = (target_date - chrono::Duration::days(6)).and_time(NaiveTime::MIN);
        let window_end = (target_date + chrono::Duration::days(1)).and_time(NaiveTime::MIN);

        let rows = report::Entity::find()
            .join(JoinType::InnerJoin, report::Relation::Conversations.def())
            .filter(conversations::Column::UserId.eq(user_id.to_string()))
            .filter(report::Column::DeletedAt.is_null())
            .filter(report::Column::CreatedAt.gte(window_start))
            .filter(report::Column::CreatedAt.lt(window_end))
            .order_by_asc(report::Column::SnowflakeId)
            .all(&self.db)
            .await?;

        let emotion_ids: Vec<String> = rows.iter().map(|r| r.emotion_id.clone()).collect();
        let totals: HashMap<String, i32> = if emotion_ids.is_empty() {
            HashMap::new()
        } else {
            emotion::Entity::find()
                .filter(emotion::Column::Id.is_in(emotion_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|m| (m.id, m.total_score))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|r| DailyScore {
                created_at: r.created_at,
                score: totals.get(&r.emotion_id).copied().unwrap_or(0),
            })
            .collect())
    }
}

/// Escapes LIKE wildcards with `!` so tag text cannot act as a pattern.
fn escape_like(s: &str) -> String {
    s.replace('!', "!!").replace('%', "!%").replace('_', "!_")
}
