//! OpenAI Chat Completions story generator (`/chat/completions`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::StoryGenerator;
use crate::config::{
    Config, DEFAULT_BASE_URL, DEFAULT_STORY_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT,
};
use crate::error::StoryError;
use crate::provider::http::{bearer_headers, shared_client, status_to_error, trim_trailing_slash};
use crate::util::timeout::with_timeout;

/// Non-streaming chat completion client used for story generation.
#[derive(Debug, Clone)]
pub struct OpenAiStoryGenerator {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
    timeout: Duration,
}

impl OpenAiStoryGenerator {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_STORY_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn new_with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::new(api_key)
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new_with_base_url(config.api_key().to_string(), config.base_url())
            .with_model(config.story_model())
            .with_temperature(config.temperature())
            .with_timeout(config.timeout())
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate(&self, prompt: &str) -> Result<(), StoryError> {
        if self.api_key.trim().is_empty() {
            return Err(StoryError::Configuration(
                "Missing OpenAI API key for story generation".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(StoryError::Configuration(
                "Story model cannot be empty".to_string(),
            ));
        }
        if prompt.trim().is_empty() {
            return Err(StoryError::InvalidArgument(
                "Prompt cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.temperature,
            "stream": false,
        })
    }
}

#[async_trait]
impl StoryGenerator for OpenAiStoryGenerator {
    async fn generate_story(&self, prompt: &str) -> Result<String, StoryError> {
        self.validate(prompt)?;

        let url = format!("{}/chat/completions", trim_trailing_slash(&self.base_url));
        let body = self.build_request_body(prompt);

        debug!(model = %self.model, temperature = self.temperature, "OpenAI generate_story");

        let story = with_timeout(self.timeout, async {
            let resp = shared_client()
                .post(&url)
                .headers(bearer_headers(&self.api_key))
                .json(&body)
                .send()
                .await?;

            let status = resp.status().as_u16();
            if status != 200 {
                let body_text = resp.text().await.unwrap_or_default();
                return Err(status_to_error(status, &body_text));
            }

            let text = resp.text().await?;
            let data: OpenAiChatResponse = serde_json::from_str(&text)?;
            extract_story(data)
        })
        .await?;

        info!(model = %self.model, chars = story.chars().count(), "Story generated");
        Ok(story)
    }
}

fn extract_story(data: OpenAiChatResponse) -> Result<String, StoryError> {
    let choice = data
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| StoryError::InvalidResponse("No choices in OpenAI response".to_string()))?;

    match choice.message.content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => Err(StoryError::InvalidResponse(
            "OpenAI response contained an empty story".to_string(),
        )),
    }
}

// OpenAI API response types (internal)

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}
