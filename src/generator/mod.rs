pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation service returned {code}: {body}")]
    Status { code: u16, body: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("generation response contained no text")]
    EmptyResponse,

    #[error("failed to write changelog: {0}")]
    Io(#[from] std::io::Error),
}

/// A chat-style text generation service: one system message, one user
/// message, plain text back.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError>;
}
