use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{prelude::*, Set, TransactionTrait};
use uuid::Uuid;

use crate::models::internal::User;
use crate::storage::entities::{conversations, lemons, report, users};
use crate::storage::RepositoryError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a user and seeds their lemon balance.
    async fn create(&self, nickname: Option<String>) -> Result<User, RepositoryError>;

    /// Active users only; soft-deleted rows are invisible here.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;

    /// Soft-deletes the user and, transitively, every report of theirs.
    async fn deactivate(&self, id: Uuid) -> Result<(), RepositoryError>;
}

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
    initial_lemon_count: i32,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection, initial_lemon_count: i32) -> Self {
        Self {
            db,
            initial_lemon_count,
        }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, nickname: Option<String>) -> Result<User, RepositoryError> {
        let now = chrono::Utc::now().naive_utc();
        let user_id = Uuid::new_v4();

        let txn = self.db.begin().await?;

        let user = users::ActiveModel {
            id: Set(user_id.to_string()),
            nickname: Set(nickname),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&txn)
        .await?;

        lemons::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            lemon_count: Set(self.initial_lemon_count),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        tracing::info!("Created user: {}", user_id);

        Ok(User::from(user))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let model = users::Entity::find_by_id(id.to_string())
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        Ok(model.map(User::from))
    }

    async fn deactivate(&self, id: Uuid) -> Result<(), RepositoryError> {
        let now = chrono::Utc::now().naive_utc();
        let txn = self.db.begin().await?;

        let user = users::Entity::find_by_id(id.to_string())
            .filter(users::Column::DeletedAt.is_null())
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("User not found: {id}")))?;

        let mut active: users::ActiveModel = user.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&txn).await?;

        let conversation_ids: Vec<String> = conversations::Entity::find()
            .filter(conversations::Column::UserId.eq(id.to_string()))
            .all(&txn)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        if !conversation_ids.is_empty() {
            report::Entity::update_many()
                .col_expr(report::Column::DeletedAt, Expr::value(Some(now)))
                .filter(report::Column::ConversationId.is_in(conversation_ids))
                .filter(report::Column::DeletedAt.is_null())
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        tracing::info!("Deactivated user: {}", id);

        Ok(())
    }
}
