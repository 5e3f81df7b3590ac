use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::internal::{Emotion, ReportListItem, TranscriptEntry};
use crate::orchestrator::chat::ChatHistoryEntry;
use crate::orchestrator::ReportDetail;

// ==================== REQUEST DTOs ====================

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReportCreateRequest {
    pub conversation_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReportSearchRequest {
    #[validate(length(min = 1, max = 100))]
    pub keywords: String,
    #[serde(default = "default_search_limit")]
    #[validate(range(min = 1, max = 20))]
    pub limit: u64,
    #[validate(length(max = 100))]
    pub cursor: Option<String>,
}

fn default_search_limit() -> u64 {
    20
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MonthlyReportsQuery {
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    #[serde(default = "default_monthly_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u64,
    #[validate(length(max = 100))]
    pub cursor: Option<String>,
}

fn default_monthly_limit() -> u64 {
    20
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WeeklyScoresQuery {
    pub target_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DrawingDiaryCreateRequest {
    pub conversation_id: Uuid,
    #[validate(length(min = 1, max = 256))]
    pub image_url: String,
    #[validate(length(min = 1, max = 50))]
    pub image_title: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConversationStartRequest {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MessageSendRequest {
    pub conversation_id: Uuid,
    #[validate(length(min = 1, max = 2000))]
    pub message: Option<String>,
    #[validate(length(min = 1, max = 512))]
    pub image_path: Option<String>,
}

// ==================== RESPONSE DTOs ====================

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportCreateResponse {
    pub report_id: Uuid,
    pub keyword: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmotionDto {
    pub comfortable_percentage: f64,
    pub happy_percentage: f64,
    pub sad_percentage: f64,
    pub joyful_percentage: f64,
    pub annoyed_percentage: f64,
    pub lethargic_percentage: f64,
    pub total_score: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportSummaryDto {
    pub summary: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DrawingDiaryDto {
    pub image_url: String,
    pub image_title: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportDetailResponse {
    pub report_id: Uuid,
    pub report_summary: ReportSummaryDto,
    pub emotions: EmotionDto,
    pub conversation_id: Uuid,
    pub drawing_diary: Option<DrawingDiaryDto>,
    pub chat_history: Vec<TranscriptEntry>,
    pub images: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportListItemDto {
    pub report_id: Uuid,
    pub conversation_id: Uuid,
    pub tags: Vec<String>,
    pub ai_summary: String,
    pub thumbnail: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportListResponse {
    pub reports: Vec<ReportListItemDto>,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WeeklyScoreDto {
    /// Day of the report in `MM/DD` form.
    pub date: String,
    pub score: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WeeklyScoresResponse {
    pub results: Vec<WeeklyScoreDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatHistoryMessage {
    pub message_id: Uuid,
    pub idx: i32,
    pub is_from_user: bool,
    pub message: Option<String>,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationStartResponse {
    pub conversation_id: Uuid,
    pub is_enough: bool,
    pub chat_history: Vec<ChatHistoryMessage>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageSendResponse {
    pub message: String,
    pub is_enough: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessagesResponse {
    pub messages: Vec<ChatHistoryMessage>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LemonCountResponse {
    pub lemon_count: i32,
}

// ==================== CONVERSIONS ====================

impl From<&Emotion> for EmotionDto {
    fn from(emotion: &Emotion) -> Self {
        let pct = emotion.percentages();
        Self {
            comfortable_percentage: pct.comfortable,
            happy_percentage: pct.happy,
            sad_percentage: pct.sad,
            joyful_percentage: pct.joyful,
            annoyed_percentage: pct.annoyed,
            lethargic_percentage: pct.lethargic,
            total_score: emotion.total_score,
        }
    }
}

impl From<ReportDetail> for ReportDetailResponse {
    fn from(detail: ReportDetail) -> Self {
        let ReportDetail {
            view,
            chat_history,
            images,
        } = detail;
        let emotions = EmotionDto::from(&view.emotion);

        Self {
            report_id: view.report.id,
            report_summary: ReportSummaryDto {
                summary: view.summary.contents,
                tags: view.tags,
            },
            emotions,
            conversation_id: view.report.conversation_id,
            drawing_diary: view.drawing_diary.map(|d| DrawingDiaryDto {
                image_url: d.image_url,
                image_title: d.image_title,
            }),
            chat_history,
            images,
        }
    }
}

impl From<ReportListItem> for ReportListItemDto {
    fn from(item: ReportListItem) -> Self {
        Self {
            report_id: item.report_id,
            conversation_id: item.conversation_id,
            tags: item.tags,
            ai_summary: item.ai_summary,
            thumbnail: item.thumbnail,
            created_at: item.created_at,
        }
    }
}

impl From<ChatHistoryEntry> for ChatHistoryMessage {
    fn from(entry: ChatHistoryEntry) -> Self {
        Self {
            message_id: entry.message_id,
            idx: entry.idx,
            is_from_user: entry.is_from_user,
            message: entry.message,
            image_url: entry.image_url,
            created_at: entry.created_at,
        }
    }
}
