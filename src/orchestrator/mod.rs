pub mod chat;
pub mod extractors;
pub mod transcript;

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::internal::{
    DailyScore, DrawingDiary, ReportListItem, ReportView, TranscriptEntry,
};
use crate::services::llm_client::LlmClient;
use crate::services::media::MediaService;
use crate::storage::chat_repository::ChatRepository;
use crate::storage::cursor;
use crate::storage::lemon_repository::LemonRepository;
use crate::storage::report_repository::{NewReport, ReportRepository};

/// A report joined with its conversation context, as the detail endpoints
/// serve it.
#[derive(Debug)]
pub struct ReportDetail {
    pub view: ReportView,
    pub chat_history: Vec<TranscriptEntry>,
    pub images: Vec<String>,
}

pub struct ReportOrchestrator {
    report_repo: Arc<dyn ReportRepository>,
    chat_repo: Arc<dyn ChatRepository>,
    lemon_repo: Arc<dyn LemonRepository>,
    media: Arc<MediaService>,
    pub transcript_assembler: transcript::TranscriptAssembler,
    pub keyword_extractor: extractors::KeywordExtractor,
    pub summary_extractor: extractors::SummaryExtractor,
    pub emotion_extractor: extractors::EmotionExtractor,
}

impl ReportOrchestrator {
    pub fn new(
        report_repo: Arc<dyn ReportRepository>,
        chat_repo: Arc<dyn ChatRepository>,
        lemon_repo: Arc<dyn LemonRepository>,
        llm: Arc<LlmClient>,
        media: Arc<MediaService>,
    ) -> Self {
        Self {
            transcript_assembler: transcript::TranscriptAssembler::new(
                chat_repo.clone(),
                media.clone(),
            ),
            keyword_extractor: extractors::KeywordExtractor::new(llm.clone()),
            summary_extractor: extractors::SummaryExtractor::new(llm.clone()),
            emotion_extractor: extractors::EmotionExtractor::new(llm),
            report_repo,
            chat_repo,
            lemon_repo,
            media,
        }
    }

    /// Runs the full pipeline for one conversation: guard checks, transcript
    /// assembly, the three extractions in parallel, then one transactional
    /// write that also spends a lemon.
    pub async fn create_report(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<(Uuid, Vec<String>), AppError> {
        if self
            .report_repo
            .find_by_conversation_id(conversation_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Report already exists for this conversation".to_string(),
            ));
        }

        let lemon = self.lemon_repo.find_by_user(user_id).await?;
        if lemon.lemon_count <= 0 {
            return Err(AppError::ResourceExhausted(
                "No lemons left to spend on a report".to_string(),
            ));
        }

        let entries = self.transcript_assembler.assemble(conversation_id).await?;
        let rendered = transcript::render_transcript(&entries);

        let (keywords, summary, emotion) = tokio::try_join!(
            self.keyword_extractor.extract(&rendered),
            self.summary_extractor.extract(&rendered),
            self.emotion_extractor.extract(&rendered),
        )?;

        let report = self
            .report_repo
            .create_report(NewReport {
                conversation_id,
                user_id,
                summary: summary.summary,
                keywords: keywords.keywords.clone(),
                sentiment: emotion.sentiment,
                scores: emotion.clamped(),
            })
            .await?;

        Ok((report.id, keywords.keywords))
    }

    pub async fn daily_report_by_conversation(
        &self,
        conversation_id: Uuid,
    ) -> Result<ReportDetail, AppError> {
        let view = self
            .report_repo
            .find_by_conversation_id(conversation_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Report not found for conversation: {conversation_id}"
                ))
            })?;

        self.with_context(view).await
    }

    pub async fn daily_report_by_id(
        &self,
        report_id: Uuid,
    ) -> Result<ReportDetail, AppError> {
        let view = self
            .report_repo
            .find_by_report_id(report_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report not found: {report_id}")))?;

        self.with_context(view).await
    }

    pub async fn attach_illustration(
        &self,
        conversation_id: Uuid,
        image_url: &str,
        image_title: &str,
    ) -> Result<DrawingDiary, AppError> {
        if image_url.trim().is_empty() {
            return Err(AppError::Validation(
                "Image URL must not be empty".to_string(),
            ));
        }
        if image_title.trim().is_empty() {
            return Err(AppError::Validation(
                "Image title must not be empty".to_string(),
            ));
        }

        let diary = self
            .report_repo
            .attach_drawing_diary(conversation_id, image_url, image_title)
            .await?;
        Ok(diary)
    }

    /// Whitespace-separated keywords, OR-matched against report tags.
    pub async fn search_reports(
        &self,
        keywords: &str,
        limit: u64,
        cursor: Option<&str>,
    ) -> Result<(Vec<ReportListItem>, Option<String>), AppError> {
        let tokens: Vec<String> = keywords.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            return Err(AppError::Validation(
                "Search keywords must not be empty".to_string(),
            ));
        }

        let cursor_id = cursor.map(cursor::decode).transpose()?;
        let items = self.report_repo.search(&tokens, limit, cursor_id).await?;
        let next_cursor = cursor::page_cursor(&items, limit);
        Ok((items, next_cursor))
    }

    pub async fn monthly_reports(
        &self,
        year: i32,
        month: u32,
        limit: u64,
        cursor: Option<&str>,
    ) -> Result<(Vec<ReportListItem>, Option<String>), AppError> {
        let cursor_id = cursor.map(cursor::decode).transpose()?;
        let items = self
            .report_repo
            .list_monthly(year, month, limit, cursor_id)
            .await?;
        let next_cursor = cursor::page_cursor(&items, limit);
        Ok((items, next_cursor))
    }

    /// Scores for the 7-day window ending at `target_date` (today when
    /// absent), oldest first.
    pub async fn weekly_scores(
        &self,
        user_id: Uuid,
        target_date: Option<NaiveDate>,
    ) -> Result<Vec<DailyScore>, AppError> {
        let date = target_date.unwrap_or_else(|| chrono::Utc::now().date_naive());
        let scores = self.report_repo.weekly_scores(user_id, date).await?;
        Ok(scores)
    }

    async fn with_context(&self, view: ReportView) -> Result<ReportDetail, AppError> {
        let conversation_id = view.report.conversation_id;
        let chat_history = self.transcript_assembler.assemble(conversation_id).await?;
        let images = self
            .chat_repo
            .images_for_conversation(conversation_id)
            .await?
            .iter()
            .map(|img| self.media.public_url(&img.path))
            .collect();

        Ok(ReportDetail {
            view,
            chat_history,
            images,
        })
    }
}
