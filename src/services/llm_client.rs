use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Model returned an empty completion")]
    EmptyResponse,
    #[error("Model returned invalid JSON: {reason}")]
    InvalidJson { reason: String },
}

const REPAIR_SYSTEM_PROMPT: &str = "You fix malformed JSON. Answer with the corrected JSON \
     document only, no prose and no code fences.";

#[derive(Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Single chat completion round trip.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatRequestMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatRequestMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LlmError::Api {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }

    /// Completion that must come back as JSON deserializable into `T`.
    /// A malformed first answer gets one repair round before giving up.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        system: &str,
        user: &str,
    ) -> Result<T, LlmError> {
        let raw = self.complete(system, user).await?;
        match serde_json::from_str(strip_json_fences(&raw)) {
            Ok(parsed) => Ok(parsed),
            Err(first_err) => {
                tracing::warn!("Malformed extractor JSON, attempting repair: {}", first_err);
                let repair_user = format!(
                    "The following output should be a JSON document but failed to parse \
                     ({first_err}):\n\n{raw}\n\nReturn the same data as valid JSON only."
                );
                let repaired = self.complete(REPAIR_SYSTEM_PROMPT, &repair_user).await?;
                serde_json::from_str(strip_json_fences(&repaired))
                    .map_err(|e| LlmError::InvalidJson {
                        reason: e.to_string(),
                    })
            }
        }
    }
}

/// Strips the Markdown code fence models like to wrap JSON in.
pub fn strip_json_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_prefix = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_prefix
        .strip_suffix("```")
        .unwrap_or(without_prefix)
        .trim()
}

// Request/Response Models
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatRequestMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequestMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}
