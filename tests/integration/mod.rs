// Shared harness for the integration suites: an in-memory database behind the
// real repositories, and a wiremock server standing in for the reasoning
// service.

use std::sync::Arc;

use axum::Router;
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gurumi_server::{
    api::routes::{create_router, AppState},
    config::Config,
    orchestrator::{chat::ChatService, ReportOrchestrator},
    services::{llm_client::LlmClient, media::MediaService},
    storage::{
        init_db, ChatRepository, SeaOrmChatRepository, SeaOrmLemonRepository,
        SeaOrmReportRepository, SeaOrmUserRepository, SnowflakeGenerator, UserRepository,
    },
};

pub mod api;
pub mod repository;

pub const TEST_API_KEY: &str = "test_key_12345678901234567890123456789012";
pub const INITIAL_LEMONS: i32 = 10;

pub fn test_config(llm_url: &str) -> Config {
    Config {
        server_port: 8080,
        api_key: TEST_API_KEY.to_string(),
        database_url: "sqlite::memory:".to_string(),
        llm_api_url: llm_url.to_string(),
        llm_api_key: "test-llm-key".to_string(),
        llm_model: "test-model".to_string(),
        media_base_url: "http://media.test".to_string(),
        media_bucket: "gurumi-media".to_string(),
        initial_lemon_count: INITIAL_LEMONS,
        snowflake_machine_id: 1,
        max_connections: 10,
        log_level: "info".to_string(),
    }
}

pub struct TestEnv {
    pub db: DatabaseConnection,
    pub state: AppState,
    pub users: Arc<SeaOrmUserRepository>,
    pub chat_repo: Arc<SeaOrmChatRepository>,
    pub report_repo: Arc<SeaOrmReportRepository>,
    pub lemon_repo: Arc<SeaOrmLemonRepository>,
}

impl TestEnv {
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }
}

pub async fn test_env(llm_url: &str) -> TestEnv {
    let config = Arc::new(test_config(llm_url));
    let db = init_db("sqlite::memory:").await.unwrap();

    let snowflakes = Arc::new(SnowflakeGenerator::new(config.snowflake_machine_id));
    let users = Arc::new(SeaOrmUserRepository::new(
        db.clone(),
        config.initial_lemon_count,
    ));
    let chat_repo = Arc::new(SeaOrmChatRepository::new(db.clone()));
    let lemon_repo = Arc::new(SeaOrmLemonRepository::new(db.clone()));
    let report_repo = Arc::new(SeaOrmReportRepository::new(db.clone(), snowflakes));

    let llm = Arc::new(LlmClient::new(
        &config.llm_api_url,
        &config.llm_api_key,
        &config.llm_model,
    ));
    let media = Arc::new(MediaService::new(
        &config.media_base_url,
        &config.media_bucket,
    ));

    let chat = Arc::new(ChatService::new(
        chat_repo.clone(),
        users.clone(),
        llm.clone(),
        media.clone(),
    ));
    let reports = Arc::new(ReportOrchestrator::new(
        report_repo.clone(),
        chat_repo.clone(),
        lemon_repo.clone(),
        llm,
        media,
    ));

    let state = AppState {
        config,
        chat,
        reports,
        users: users.clone(),
        lemons: lemon_repo.clone(),
    };

    TestEnv {
        db,
        state,
        users,
        chat_repo,
        report_repo,
        lemon_repo,
    }
}

pub async fn create_test_user(env: &TestEnv) -> Uuid {
    env.users
        .create(Some("tester".to_string()))
        .await
        .unwrap()
        .id
}

/// A conversation on `date` with `message_count` alternating ai/user messages.
pub async fn seed_conversation(
    env: &TestEnv,
    user_id: Uuid,
    date: NaiveDate,
    message_count: usize,
) -> Uuid {
    let (conversation, _) = env
        .chat_repo
        .find_or_create_conversation(user_id, date)
        .await
        .unwrap();

    for i in 0..message_count {
        let from_user = i % 2 == 1;
        let text = if from_user {
            format!("오늘 있었던 일 이야기 {i}")
        } else {
            format!("그랬구나, 더 말해줘 {i}")
        };
        env.chat_repo
            .append_message(conversation.id, from_user, Some(text), None)
            .await
            .unwrap();
    }

    conversation.id
}

// ---- Reasoning-service mocks ----

pub fn completion_body(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"content": content}}]
    }))
}

/// Mounts well-formed responses for all three extraction prompts.
pub async fn mount_extractors(
    server: &MockServer,
    keywords: &[&str],
    summary: &str,
    sentiment: i32,
) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Pick 3 to 8 short keywords"))
        .respond_with(completion_body(&json!({ "keywords": keywords }).to_string()))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("diary-style summary"))
        .respond_with(completion_body(&json!({ "summary": summary }).to_string()))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("overall sentiment"))
        .respond_with(completion_body(
            &json!({
                "sentiment": sentiment,
                "emotions": {
                    "comfortable": 2, "happy": 5, "sadness": 1,
                    "joyful": 4, "annoyed": 0, "lethargic": 0
                }
            })
            .to_string(),
        ))
        .mount(server)
        .await;
}
