use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::models::internal::TranscriptEntry;
use crate::services::media::MediaService;
use crate::storage::chat_repository::ChatRepository;
use crate::storage::RepositoryError;

pub struct TranscriptAssembler {
    chat_repo: Arc<dyn ChatRepository>,
    media: Arc<MediaService>,
}

impl TranscriptAssembler {
    pub fn new(chat_repo: Arc<dyn ChatRepository>, media: Arc<MediaService>) -> Self {
        Self { chat_repo, media }
    }

    /// Rebuilds the whole conversation in `idx` order. Text messages carry
    /// their text, image messages carry the image's public URL.
    pub async fn assemble(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<TranscriptEntry>, RepositoryError> {
        self.chat_repo
            .find_conversation(conversation_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("Conversation not found: {conversation_id}"))
            })?;

        let messages = self.chat_repo.list_messages(conversation_id).await?;
        // A conversation that was never spoken in has nothing to distill.
        if messages.is_empty() {
            return Err(RepositoryError::NotFound(format!(
                "Conversation has no messages: {conversation_id}"
            )));
        }

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
            .map(|m| {
                let role = TranscriptEntry::role_for(m.is_from_user).to_string();
                match (m.content, by_message.get(&m.id)) {
                    (Some(text), _) => TranscriptEntry {
                        role,
                        content: text,
                        is_image: false,
                    },
                    (None, Some(url)) => TranscriptEntry {
                        role,
                        content: url.clone(),
                        is_image: true,
                    },
                    (None, None) => TranscriptEntry {
                        role,
                        content: String::new(),
                        is_image: false,
                    },
                }
            })
            .collect())
    }
}

/// One "role: content" line per entry, the form the extraction prompts expect.
pub fn render_transcript(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}: {}", e.role, e.content))
        .collect::<Vec<_>>()
        .join("\n")
}
