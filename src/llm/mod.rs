//! Generation client: one chat-style exchange with an LLM.

mod client;

pub use client::{GenerationError, OpenAiClient};

use async_trait::async_trait;

use crate::models::Prompt;

/// Anything that can turn a [`Prompt`] into model text.
///
/// Implementations return the response text verbatim and never retry.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError>;
}
