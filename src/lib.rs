//! Gurumi Server - emotional diary companion backend

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod storage;

// Re-export main types for convenience
pub use crate::api::dto::*;
pub use crate::api::routes::{create_router, AppState};
pub use crate::config::Config;
pub use crate::errors::AppError;
pub use crate::orchestrator::{chat::ChatService, ReportOrchestrator};
pub use crate::services::{LlmClient, MediaService};
pub use crate::storage::db::init_db;
pub use crate::storage::{
    ChatRepository, LemonRepository, NewReport, ReportRepository, SeaOrmChatRepository,
    SeaOrmLemonRepository, SeaOrmReportRepository, SeaOrmUserRepository, SnowflakeGenerator,
    UserRepository,
};
