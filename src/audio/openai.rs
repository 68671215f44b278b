//! OpenAI speech synthesizer (`/audio/speech`), streamed to disk.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::tts::SpeechSynthesizer;
use super::types::{AudioFormat, Voice};
use crate::config::{Config, DEFAULT_BASE_URL, DEFAULT_SPEECH_MODEL, DEFAULT_TIMEOUT};
use crate::error::StoryError;
use crate::provider::http::{
    bearer_headers, extract_openai_error_message, shared_client, status_to_error,
    trim_trailing_slash,
};
use crate::util::timeout::with_timeout;

/// OpenAI TTS client that writes the response body chunk by chunk.
#[derive(Debug, Clone)]
pub struct OpenAiSpeechSynthesizer {
    api_key: String,
    base_url: String,
    model: String,
    voice: Voice,
    format: AudioFormat,
    timeout: Duration,
}

impl OpenAiSpeechSynthesizer {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_SPEECH_MODEL.to_string(),
            voice: Voice::default(),
            format: AudioFormat::default(),
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
            .with_model(config.speech_model())
            .with_voice(config.voice())
            .with_timeout(config.timeout())
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate(&self, text: &str) -> Result<(), StoryError> {
        if self.api_key.trim().is_empty() {
            return Err(StoryError::Configuration(
                "Missing OpenAI API key for speech generation".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(StoryError::Configuration(
                "Speech model cannot be empty".to_string(),
            ));
        }
        if text.trim().is_empty() {
            return Err(StoryError::InvalidArgument(
                "Speech text cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn build_request_body(&self, text: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "voice": self.voice.as_ref(),
            "input": text,
            "response_format": self.format.as_ref(),
        })
    }

    async fn stream_once(&self, text: &str, part_path: &Path) -> Result<u64, StoryError> {
        let url = format!("{}/audio/speech", trim_trailing_slash(&self.base_url));

        let request = shared_client()
            .post(url)
            .headers(bearer_headers(&self.api_key))
            .json(&self.build_request_body(text));
        let response = with_timeout(self.timeout, async {
            Ok::<_, StoryError>(request.send().await?)
        })
        .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let body = response.text().await.unwrap_or_default();
            let message = extract_openai_error_message(&body)
                .unwrap_or_else(|| "Expected audio payload, got JSON response".to_string());
            return Err(StoryError::InvalidResponse(message));
        }

        let mut file = tokio::fs::File::create(part_path)
            .await
            .map_err(|e| StoryError::io(part_path, e))?;

        let mut written: u64 = 0;
        let mut body = response.bytes_stream();
        // The timeout bounds each chunk wait, not the whole transfer.
        while let Some(chunk) =
            with_timeout(self.timeout, async { Ok::<_, StoryError>(body.next().await) }).await?
        {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| StoryError::io(part_path, e))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| StoryError::io(part_path, e))?;

        if written == 0 {
            return Err(StoryError::InvalidResponse(
                "Speech response contained empty audio payload".to_string(),
            ));
        }

        Ok(written)
    }

    /// Stream into `part_path`, then move it into place at `path`.
    async fn stream_to_file(
        &self,
        text: &str,
        part_path: &Path,
        path: &Path,
    ) -> Result<u64, StoryError> {
        let written = self.stream_once(text, part_path).await?;
        tokio::fs::rename(part_path, path)
            .await
            .map_err(|e| StoryError::io(path, e))?;
        Ok(written)
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeechSynthesizer {
    async fn synthesize_to_file(&self, text: &str, path: &Path) -> Result<u64, StoryError> {
        self.validate(text)?;

        let part_path = partial_path(path);
        debug!(
            model = %self.model,
            voice = %self.voice,
            path = %part_path.display(),
            "OpenAI synthesize_to_file"
        );

        match self.stream_to_file(text, &part_path, path).await {
            Ok(written) => {
                info!(path = %path.display(), bytes = written, "Audio saved");
                Ok(written)
            }
            Err(err) => {
                if let Err(remove_err) = tokio::fs::remove_file(&part_path).await {
                    if remove_err.kind() != std::io::ErrorKind::NotFound {
                        warn!(
                            path = %part_path.display(),
                            error = %remove_err,
                            "Failed to remove partial audio file"
                        );
                    }
                }
                Err(err)
            }
        }
    }
}

/// `<path>.part`, the file audio is streamed into before it is complete.
fn partial_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
