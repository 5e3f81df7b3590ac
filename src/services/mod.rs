pub mod llm_client;
pub mod media;

// Re-export for convenience
pub use llm_client::{LlmClient, LlmError};
pub use media::MediaService;
