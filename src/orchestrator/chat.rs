use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::internal::TranscriptEntry;
use crate::orchestrator::transcript::render_transcript;
use crate::services::llm_client::LlmClient;
use crate::services::media::MediaService;
use crate::storage::chat_repository::ChatRepository;
use crate::storage::user_repository::UserRepository;

/// First words every new conversation opens with.
pub const GREETING: &str =
    "안녕 난 구르미야 :) 오늘 하루 있었던 일이나 기분을 말해줘. 나 구르미가 모두 다 들어줄게!";

/// A day's conversation holds enough material for a report once the message
/// count passes this.
const ENOUGH_MESSAGES: u64 = 13;

const COMPANION_SYSTEM_PROMPT: &str = "You are Gurumi, a small cloud friend living inside a \
     diary app. The user tells you about their day and how they feel. Reply in casual, friendly \
     Korean using 반말. Empathize with what the user just said first, then ask one short \
     question that draws out more of their day. Keep each reply to one or two short sentences \
     and never lecture.";

/// One message of a conversation as shown to the client, image references
/// already resolved to public URLs.
#[derive(Debug, Clone)]
pub struct ChatHistoryEntry {
    pub message_id: Uuid,
    pub idx: i32,
    pub is_from_user: bool,
    pub message: Option<String>,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug)]
pub struct ConversationStart {
    pub conversation_id: Uuid,
    pub chat_history: Vec<ChatHistoryEntry>,
    pub is_enough: bool,
}

#[derive(Debug)]
pub struct ChatReply {
    pub message: String,
    pub is_enough: bool,
}

pub struct ChatService {
    chat_repo: Arc<dyn ChatRepository>,
    user_repo: Arc<dyn UserRepository>,
    llm: Arc<LlmClient>,
    media: Arc<MediaService>,
}

impl ChatService {
    pub fn new(
        chat_repo: Arc<dyn ChatRepository>,
        user_repo: Arc<dyn UserRepository>,
        llm: Arc<LlmClient>,
        media: Arc<MediaService>,
    ) -> Self {
        Self {
            chat_repo,
            user_repo,
            llm,
            media,
        }
    }

    /// Opens (or resumes) the user's conversation for `date`, seeding a new
    /// one with the companion's greeting.
    pub async fn start_conversation(
        &self,
        user_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<ConversationStart, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found: {user_id}")))?;

        let date = date.unwrap_or_else(|| chrono::Utc::now().date_naive());
        let (conversation, created) = self
            .chat_repo
            .find_or_create_conversation(user_id, date)
            .await?;

        if created {
            self.chat_repo
                .append_message(conversation.id, false, Some(GREETING.to_string()), None)
                .await?;
        }

        let chat_history = self.history(conversation.id).await?;
        let is_enough = chat_history.len() as u64 > ENOUGH_MESSAGES;

        Ok(ConversationStart {
            conversation_id: conversation.id,
            chat_history,
            is_enough,
        })
    }

    /// Stores the user's message and answers it. An image message is only
    /// acknowledged; a text message gets a companion reply from the model.
    pub async fn send_message(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        text: Option<String>,
        image_path: Option<String>,
    ) -> Result<ChatReply, AppError> {
        let conversation = self
            .chat_repo
            .find_conversation(conversation_id)
            .await?
            .filter(|c| c.user_id == user_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Conversation not found: {conversation_id}"))
            })?;

        if let Some(path) = image_path {
            let extension = path.rsplit('.').next().unwrap_or_default();
            if !MediaService::allowed_extension(extension) {
                return Err(AppError::Validation(format!(
                    "Unsupported image extension: {extension}"
                )));
            }
            self.chat_repo
                .append_message(conversation.id, true, text, Some(path))
                .await?;
            let count = self.chat_repo.count_messages(conversation.id).await?;
            return Ok(ChatReply {
                message: "Image received and stored.".to_string(),
                is_enough: count > ENOUGH_MESSAGES,
            });
        }

        let text = text.filter(|t| !t.trim().is_empty()).ok_or_else(|| {
            AppError::Validation("A message requires text or an image".to_string())
        })?;

        self.chat_repo
            .append_message(conversation.id, true, Some(text), None)
            .await?;

        let history = self.history(conversation.id).await?;
        let reply = self
            .llm
            .complete(
                COMPANION_SYSTEM_PROMPT,
                &render_transcript(&to_transcript(&history)),
            )
            .await?;

        self.chat_repo
            .append_message(conversation.id, false, Some(reply.clone()), None)
            .await?;
        let count = self.chat_repo.count_messages(conversation.id).await?;

        Ok(ChatReply {
            message: reply,
            is_enough: count > ENOUGH_MESSAGES,
        })
    }

    pub async fn list_history(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<Vec<ChatHistoryEntry>, AppError> {
        self.chat_repo
            .find_conversation(conversation_id)
            .await?
            .filter(|c| c.user_id == user_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Conversation not found: {conversation_id}"))
            })?;

        self.history(conversation_id).await
    }

    async fn history(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<ChatHistoryEntry>, AppError> {
        let messages = self.chat_repo.list_messages(conversation_id).await?;
        let images = self.chat_repo.images_for_conversation(conversation_id).await?;
        let by_message: HashMap<Uuid, String> = images
            .iter()
            .filter_map(|img| {
                img.message_id
                    .map(|mid| (mid, self.media.public_url(&img.path)))
            })
            .collect();

        Ok(messages
            .into_iter()
            .map(|m| ChatHistoryEntry {
                image_url: by_message.get(&m.id).cloned(),
                message_id: m.id,
                idx: m.idx,
                is_from_user: m.is_from_user,
                message: m.content,
                created_at: m.created_at,
            })
            .collect())
    }
}

fn to_transcript(history: &[ChatHistoryEntry]) -> Vec<TranscriptEntry> {
    history
        .iter()
        .map(|h| TranscriptEntry {
            role: TranscriptEntry::role_for(h.is_from_user).to_string(),
            is_image: h.message.is_none() && h.image_url.is_some(),
            content: h
                .message
                .clone()
                .or_else(|| h.image_url.clone())
                .unwrap_or_default(),
        })
        .collect()
}
