use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{prelude::*, QueryOrder, Set, TransactionTrait};
use uuid::Uuid;

use crate::models::internal::{ChatMessage, Conversation, Image};
use crate::storage::entities::{conversations, images, messages};
use crate::storage::{map_insert_err, RepositoryError};

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Returns the user's conversation for the given date, creating it when
    /// absent. The bool is true when a new conversation was created.
    async fn find_or_create_conversation(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<(Conversation, bool), RepositoryError>;

    async fn find_conversation(
        &self,
        id: Uuid,
    ) -> Result<Option<Conversation>, RepositoryError>;

    /// Every message of the conversation in ascending `idx` order.
    async fn list_messages(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;

    async fn count_messages(&self, conversation_id: Uuid) -> Result<u64, RepositoryError>;

    /// Appends a message with `idx` = current count + 1. An `image_path`
    /// additionally stores an image row linked to the new message.
    async fn append_message(
        &self,
        conversation_id: Uuid,
        is_from_user: bool,
        content: Option<String>,
        image_path: Option<String>,
    ) -> Result<ChatMessage, RepositoryError>;

    /// Chat-attached images of the conversation, oldest first.
    async fn images_for_conversation(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<Image>, RepositoryError>;
}

pub struct SeaOrmChatRepository {
    db: DatabaseConnection,
}

impl SeaOrmChatRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_by_user_and_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<conversations::Model>, RepositoryError> {
        let model = conversations::Entity::find()
            .filter(conversations::Column::UserId.eq(user_id.to_string()))
            .filter(conversations::Column::Date.eq(date))
            .one(&self.db)
            .await?;
        Ok(model)
    }
}

#[async_trait]
impl ChatRepository for SeaOrmChatRepository {
    async fn find_or_create_conversation(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<(Conversation, bool), RepositoryError> {
        if let Some(existing) = self.find_by_user_and_date(user_id, date).await? {
            return Ok((Conversation::from(existing), false));
        }

        let now = chrono::Utc::now().naive_utc();
        let inserted = conversations::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            date: Set(date),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await;

        match inserted {
            Ok(model) => {
                tracing::info!("Created conversation: {}", model.id);
                Ok((Conversation::from(model), true))
            }
            // Lost a create race for the same user and date; fetch the winner.
            Err(e) => match map_insert_err(e, "Conversation") {
                RepositoryError::Duplicate(_) => {
                    let existing =
                        self.find_by_user_and_date(user_id, date).await?.ok_or_else(|| {
                            RepositoryError::NotFound(format!(
                                "Conversation not found for user {user_id} on {date}"
                            ))
                        })?;
                    Ok((Conversation::from(existing), false))
                }
                other => Err(other),
            },
        }
    }

    async fn find_conversation(
        &self,
        id: Uuid,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let model = conversations::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(Conversation::from))
    }

    async fn list_messages(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let models = messages::Entity::find()
            .filter(messages::Column::ConversationId.eq(conversation_id.to_string()))
            .order_by_asc(messages::Column::Idx)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(ChatMessage::from).collect())
    }

    async fn count_messages(&self, conversation_id: Uuid) -> Result<u64, RepositoryError> {
        let count = messages::Entity::find()
            .filter(messages::Column::ConversationId.eq(conversation_id.to_string()))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn append_message(
        &self,
        conversation_id: Uuid,
        is_from_user: bool,
        content: Option<String>,
        image_path: Option<String>,
    ) -> Result<ChatMessage, RepositoryError> {
        if content.is_none() && image_path.is_none() {
            return Err(RepositoryError::InvalidInput(
                "A message requires text or an image".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        conversations::Entity::find_by_id(conversation_id.to_string())
            .one(&txn)
            .await?
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("Conversation not found: {conversation_id}"))
            })?;

        let existing = messages::Entity::find()
            .filter(messages::Column::ConversationId.eq(conversation_id.to_string()))
            .count(&txn)
            .await?;
        let idx = existing as i32 + 1;

        let now = chrono::Utc::now().naive_utc();
        let message_id = Uuid::new_v4();

        let message = messages::ActiveModel {
            id: Set(message_id.to_string()),
            conversation_id: Set(conversation_id.to_string()),
            idx: Set(idx),
            is_from_user: Set(is_from_user),
            content: Set(content),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        if let Some(path) = image_path {
            let extension = path.rsplit('.').next().unwrap_or("").to_lowercase();
            images::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                path: Set(path),
                extension: Set(extension),
                conversation_id: Set(Some(conversation_id.to_string())),
                message_id: Set(Some(message_id.to_string())),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        Ok(ChatMessage::from(message))
    }

    async fn images_for_conversation(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<Image>, RepositoryError> {
        let models = images::Entity::find()
            .filter(images::Column::ConversationId.eq(conversation_id.to_string()))
            .order_by_asc(images::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Image::from).collect())
    }
}
