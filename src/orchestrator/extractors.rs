use std::sync::Arc;

use serde::Deserialize;

use crate::models::internal::EmotionScores;
use crate::services::llm_client::{LlmClient, LlmError};

const KEYWORD_SYSTEM_PROMPT: &str = "You read a day's diary conversation between a user and \
     their companion. Pick 3 to 8 short keywords that best capture what the day was about, in \
     the language the user wrote in. Respond with JSON only, exactly in this shape: \
     {\"keywords\": [\"...\"]}";

const SUMMARY_SYSTEM_PROMPT: &str = "You read a day's diary conversation between a user and \
     their companion. Write a warm diary-style summary of the user's day in two to four \
     sentences, from the user's point of view, in the language the user wrote in. Respond with \
     JSON only, exactly in this shape: {\"summary\": \"...\"}";

const EMOTION_SYSTEM_PROMPT: &str = "You read a day's diary conversation between a user and \
     their companion. Judge the overall sentiment of the user's day as an integer from 0 \
     (worst) to 100 (best), then score each emotion from 0 to 6 by how strongly the user felt \
     it. Respond with JSON only, exactly in this shape: {\"sentiment\": 0, \"emotions\": \
     {\"comfortable\": 0, \"happy\": 0, \"sadness\": 0, \"joyful\": 0, \"annoyed\": 0, \
     \"lethargic\": 0}}";

#[derive(Debug, Deserialize)]
pub struct KeywordsOutput {
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryOutput {
    pub summary: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmotionScoresOutput {
    #[serde(default)]
    pub comfortable: i32,
    #[serde(default)]
    pub happy: i32,
    #[serde(rename = "sadness", alias = "sad", alias = "Sadness", default)]
    pub sad: i32,
    #[serde(default)]
    pub joyful: i32,
    #[serde(default)]
    pub annoyed: i32,
    #[serde(default)]
    pub lethargic: i32,
}

#[derive(Debug, Deserialize)]
pub struct EmotionOutput {
    #[serde(default)]
    pub sentiment: i32,
    #[serde(default)]
    pub emotions: EmotionScoresOutput,
}

impl EmotionOutput {
    /// Sub-scores are specified as 0..=6; out-of-range model output is
    /// clipped instead of rejected. The sentiment total is stored as given.
    pub fn clamped(&self) -> EmotionScores {
        EmotionScores {
            comfortable: self.emotions.comfortable.clamp(0, 6),
            happy: self.emotions.happy.clamp(0, 6),
            sad: self.emotions.sad.clamp(0, 6),
            joyful: self.emotions.joyful.clamp(0, 6),
            annoyed: self.emotions.annoyed.clamp(0, 6),
            lethargic: self.emotions.lethargic.clamp(0, 6),
        }
    }
}

pub struct KeywordExtractor {
    llm: Arc<LlmClient>,
}

impl KeywordExtractor {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn extract(&self, transcript: &str) -> Result<KeywordsOutput, LlmError> {
        self.llm.call_json(KEYWORD_SYSTEM_PROMPT, transcript).await
    }
}

pub struct SummaryExtractor {
    llm: Arc<LlmClient>,
}

impl SummaryExtractor {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn extract(&self, transcript: &str) -> Result<SummaryOutput, LlmError> {
        self.llm.call_json(SUMMARY_SYSTEM_PROMPT, transcript).await
    }
}

pub struct EmotionExtractor {
    llm: Arc<LlmClient>,
}

impl EmotionExtractor {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn extract(&self, transcript: &str) -> Result<EmotionOutput, LlmError> {
        self.llm.call_json(EMOTION_SYSTEM_PROMPT, transcript).await
    }
}
