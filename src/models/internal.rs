use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub nickname: Option<String>,
    pub created_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Lemon {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lemon_count: i32,
    pub updated_at: NaiveDateTime,
}

/// One day's chat session between a user and the companion.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    /// 1-based position within the conversation; assigned at write time and
    /// never reused, so values stay unique and increasing even after deletes.
    pub idx: i32,
    pub is_from_user: bool,
    pub content: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Image {
    pub id: Uuid,
    pub path: String,
    pub extension: String,
    pub conversation_id: Option<Uuid>,
    pub message_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub id: Uuid,
    pub conversation_id: Uuid,
    /// Time-ordered 64-bit id used as the pagination cursor, distinct from `id`.
    pub snowflake_id: i64,
    pub emotion_id: Uuid,
    pub report_summary_id: Uuid,
    pub drawing_diary_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub id: Uuid,
    pub contents: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tags {
    pub id: Uuid,
    pub tags: Vec<String>,
    pub report_summary_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct DrawingDiary {
    pub id: Uuid,
    pub image_url: String,
    pub image_title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Emotion {
    pub id: Uuid,
    pub total_score: i32,
    pub comfortable_score: i32,
    pub happy_score: i32,
    pub sad_score: i32,
    pub joyful_score: i32,
    pub annoyed_score: i32,
    pub lethargic_score: i32,
}

/// The six extracted sub-scores, already clamped to the extraction bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmotionScores {
    pub comfortable: i32,
    pub happy: i32,
    pub sad: i32,
    pub joyful: i32,
    pub annoyed: i32,
    pub lethargic: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmotionPercentages {
    pub comfortable: f64,
    pub happy: f64,
    pub sad: f64,
    pub joyful: f64,
    pub annoyed: f64,
    pub lethargic: f64,
}

impl Emotion {
    /// Share of each sub-score relative to the sum of all six, in percent
    /// rounded to two decimals. A zero sum yields all zeros rather than a
    /// division error.
    pub fn percentages(&self) -> EmotionPercentages {
        let sum = self.comfortable_score
            + self.happy_score
            + self.sad_score
            + self.joyful_score
            + self.annoyed_score
            + self.lethargic_score;

        if sum == 0 {
            return EmotionPercentages {
                comfortable: 0.0,
                happy: 0.0,
                sad: 0.0,
                joyful: 0.0,
                annoyed: 0.0,
                lethargic: 0.0,
            };
        }

        let pct = |score: i32| -> f64 {
            let raw = (score as f64 / sum as f64) * 100.0;
            (raw * 100.0).round() / 100.0
        };

        EmotionPercentages {
            comfortable: pct(self.comfortable_score),
            happy: pct(self.happy_score),
            sad: pct(self.sad_score),
            joyful: pct(self.joyful_score),
            annoyed: pct(self.annoyed_score),
            lethargic: pct(self.lethargic_score),
        }
    }
}

/// A report with every linked entity loaded, as returned by detail lookups.
#[derive(Debug, Clone)]
pub struct ReportView {
    pub report: Report,
    pub summary: ReportSummary,
    pub tags: Vec<String>,
    pub emotion: Emotion,
    pub drawing_diary: Option<DrawingDiary>,
}

/// One row of a search or monthly listing page.
#[derive(Debug, Clone)]
pub struct ReportListItem {
    pub report_id: Uuid,
    pub conversation_id: Uuid,
    pub snowflake_id: i64,
    pub tags: Vec<String>,
    pub ai_summary: String,
    pub thumbnail: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Emotion total for one day inside the weekly-scores window.
#[derive(Debug, Clone)]
pub struct DailyScore {
    pub created_at: NaiveDateTime,
    pub score: i32,
}

/// One message of an assembled transcript, image references already resolved
/// to public URLs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranscriptEntry {
    pub role: String,
    pub content: String,
    pub is_image: bool,
}

impl TranscriptEntry {
    pub fn role_for(is_from_user: bool) -> &'static str {
        if is_from_user {
            "user"
        } else {
            "ai"
        }
    }
}
