//! Story generation: the text-generation seam and its OpenAI implementation.

pub mod openai;

use async_trait::async_trait;

use crate::error::StoryError;

pub use openai::OpenAiStoryGenerator;

/// Anything that can turn a prompt into a story.
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    /// Generate a non-empty story for `prompt`.
    async fn generate_story(&self, prompt: &str) -> Result<String, StoryError>;
}
