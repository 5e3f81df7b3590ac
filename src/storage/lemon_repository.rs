use async_trait::async_trait;
use sea_orm::prelude::*;
use uuid::Uuid;

use crate::models::internal::Lemon;
use crate::storage::entities::lemons;
use crate::storage::RepositoryError;

#[async_trait]
pub trait LemonRepository: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Lemon, RepositoryError>;
}

pub struct SeaOrmLemonRepository {
    db: DatabaseConnection,
}

impl SeaOrmLemonRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LemonRepository for SeaOrmLemonRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Lemon, RepositoryError> {
        let model = lemons::Entity::find()
            .filter(lemons::Column::UserId.eq(user_id.to_string()))
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("Lemon balance not found for user: {user_id}"))
            })?;

        Ok(Lemon::from(model))
    }
}
