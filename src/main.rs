use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gurumi_server::{
    api::routes,
    config::Config,
    orchestrator::{chat::ChatService, ReportOrchestrator},
    services::{llm_client::LlmClient, media::MediaService},
    storage::{
        self, SeaOrmChatRepository, SeaOrmLemonRepository, SeaOrmReportRepository,
        SeaOrmUserRepository, SnowflakeGenerator,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gurumi_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let config = Arc::new(Config::load()?);

    // Initialize database
    let db_conn = storage::init_db(&config.database_url).await?;

    let snowflakes = Arc::new(SnowflakeGenerator::new(config.snowflake_machine_id));

    let user_repo = Arc::new(SeaOrmUserRepository::new(
        db_conn.clone(),
        config.initial_lemon_count,
    ));
    let chat_repo = Arc::new(SeaOrmChatRepository::new(db_conn.clone()));
    let lemon_repo = Arc::new(SeaOrmLemonRepository::new(db_conn.clone()));
    let report_repo = Arc::new(SeaOrmReportRepository::new(db_conn, snowflakes));

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
        user_repo.clone(),
        llm.clone(),
        media.clone(),
    ));
    let reports = Arc::new(ReportOrchestrator::new(
        report_repo,
        chat_repo,
        lemon_repo.clone(),
        llm,
        media,
    ));

    // Create application state
    let state = routes::AppState {
        config: config.clone(),
        chat,
        reports,
        users: user_repo,
        lemons: lemon_repo,
    };

    let app = routes::create_router(state);

    // Start server
    let addr: SocketAddr = format!("127.0.0.1:{}", config.server_port).parse()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 Server listening on {}", addr);
    tracing::info!("🧠 Reasoning model: {} at {}", config.llm_model, config.llm_api_url);
    tracing::info!("🖼️ Media bucket: {}", config.media_bucket);

    axum::serve(listener, app).await?;

    Ok(())
}
