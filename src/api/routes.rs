use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::dto::*,
    auth::AuthUser,
    config::Config,
    errors::AppError,
    orchestrator::{chat::ChatService, ReportOrchestrator},
    storage::{LemonRepository, UserRepository},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chat: Arc<ChatService>,
    pub reports: Arc<ReportOrchestrator>,
    pub users: Arc<dyn UserRepository>,
    pub lemons: Arc<dyn LemonRepository>,
}

pub async fn create_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ReportCreateRequest>,
) -> Result<Json<ReportCreateResponse>, AppError> {
    let (report_id, keyword) = state
        .reports
        .create_report(auth.user_id, req.conversation_id)
        .await?;

    Ok(Json(ReportCreateResponse { report_id, keyword }))
}

pub async fn report_detail(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<ReportDetailResponse>, AppError> {
    let detail = state
        .reports
        .daily_report_by_conversation(conversation_id)
        .await?;

    Ok(Json(ReportDetailResponse::from(detail)))
}

pub async fn report_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(report_id): Path<Uuid>,
) -> Result<Json<ReportDetailResponse>, AppError> {
    let detail = state.reports.daily_report_by_id(report_id).await?;

    Ok(Json(ReportDetailResponse::from(detail)))
}

pub async fn search_reports(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<ReportSearchRequest>,
) -> Result<Json<ReportListResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (items, next_cursor) = state
        .reports
        .search_reports(&req.keywords, req.limit, req.cursor.as_deref())
        .await?;

    Ok(Json(ReportListResponse {
        reports: items.into_iter().map(ReportListItemDto::from).collect(),
        next_cursor,
    }))
}

pub async fn monthly_reports(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(q): Query<MonthlyReportsQuery>,
) -> Result<Json<ReportListResponse>, AppError> {
    q.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (items, next_cursor) = state
        .reports
        .monthly_reports(q.year, q.month, q.limit, q.cursor.as_deref())
        .await?;

    Ok(Json(ReportListResponse {
        reports: items.into_iter().map(ReportListItemDto::from).collect(),
        next_cursor,
    }))
}

pub async fn weekly_scores(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(q): Query<WeeklyScoresQuery>,
) -> Result<Json<WeeklyScoresResponse>, AppError> {
    let scores = state
        .reports
        .weekly_scores(auth.user_id, q.target_date)
        .await?;

    Ok(Json(WeeklyScoresResponse {
        results: scores
            .into_iter()
            .map(|s| WeeklyScoreDto {
                date: s.created_at.format("%m/%d").to_string(),
                score: s.score,
            })
            .collect(),
    }))
}

pub async fn create_drawing_diary(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<DrawingDiaryCreateRequest>,
) -> Result<(StatusCode, Json<DrawingDiaryDto>), AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let diary = state
        .reports
        .attach_illustration(req.conversation_id, &req.image_url, &req.image_title)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DrawingDiaryDto {
            image_url: diary.image_url,
            image_title: diary.image_title,
        }),
    ))
}

pub async fn start_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ConversationStartRequest>,
) -> Result<Json<ConversationStartResponse>, AppError> {
    let started = state.chat.start_conversation(auth.user_id, req.date).await?;

    Ok(Json(ConversationStartResponse {
        conversation_id: started.conversation_id,
        is_enough: started.is_enough,
        chat_history: started
            .chat_history
            .into_iter()
            .map(ChatHistoryMessage::from)
            .collect(),
    }))
}

pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<MessageSendRequest>,
) -> Result<Json<MessageSendResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let reply = state
        .chat
        .send_message(
            auth.user_id,
            req.conversation_id,
            req.message,
            req.image_path,
        )
        .await?;

    Ok(Json(MessageSendResponse {
        message: reply.message,
        is_enough: reply.is_enough,
    }))
}

pub async fn conversation_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<MessagesResponse>, AppError> {
    let history = state
        .chat
        .list_history(auth.user_id, conversation_id)
        .await?;

    Ok(Json(MessagesResponse {
        messages: history.into_iter().map(ChatHistoryMessage::from).collect(),
    }))
}

pub async fn lemon_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<LemonCountResponse>, AppError> {
    let lemon = state.lemons.find_by_user(auth.user_id).await?;

    Ok(Json(LemonCountResponse {
        lemon_count: lemon.lemon_count,
    }))
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, AppError> {
    state.users.deactivate(auth.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/report/create-daily", post(create_report))
        .route("/report/detail/{conversation_id}", get(report_detail))
        .route("/report/search", post(search_reports))
        .route("/report/monthly-reports", get(monthly_reports))
        .route("/report/weekly-scores", get(weekly_scores))
        .route("/report/drawing-diary", post(create_drawing_diary))
        .route("/report/{report_id}", get(report_by_id))
        .route("/chat/conversation", post(start_conversation))
        .route("/chat/message", post(send_message))
        .route(
            "/chat/messages/{conversation_id}",
            get(conversation_messages),
        )
        .route("/user/lemons", get(lemon_count))
        .route("/user", delete(deactivate_user))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn health() -> &'static str {
    "OK"
}
