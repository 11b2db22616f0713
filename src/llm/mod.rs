//! Chat-completion client used for query rephrasing and answer generation.
//! Both call sites constrain the model to a JSON object response.

mod openai;
pub mod prompts;

pub use openai::OpenAiChat;

use async_trait::async_trait;

use crate::errors::ApiError;

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Runs a two-message (system + user) completion in JSON mode and
    /// returns the raw response text.
    async fn complete_json(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, ApiError>;
}
