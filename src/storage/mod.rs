pub mod chat_repository;
pub mod cursor;
pub mod db;
pub mod entities;
pub mod lemon_repository;
pub mod migrations;
pub mod report_repository;
pub mod snowflake;
pub mod user_repository;

pub use chat_repository::{ChatRepository, SeaOrmChatRepository};
pub use db::init_db;
pub use lemon_repository::{LemonRepository, SeaOrmLemonRepository};
pub use report_repository::{NewReport, ReportRepository, SeaOrmReportRepository};
pub use snowflake::SnowflakeGenerator;
pub use user_repository::{SeaOrmUserRepository, UserRepository};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DbError(#[from] sea_orm::DbErr),
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Duplicate entity: {0}")]
    Duplicate(String),
    #[error("Resource exhausted: {0}")]
    Exhausted(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Maps a unique constraint violation on insert to `Duplicate`, everything
/// else to `DbError`.
pub(crate) fn map_insert_err(e: sea_orm::DbErr, what: &str) -> RepositoryError {
    match e.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
            RepositoryError::Duplicate(format!("{what} already exists"))
        }
        _ => RepositoryError::DbError(e),
    }
}
