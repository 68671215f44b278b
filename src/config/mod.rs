//! Runtime configuration (env + `.env`, then CLI overrides).

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::audio::Voice;
use crate::error::{Result, StoryError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_STORY_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SPEECH_MODEL: &str = "gpt-4o-mini-tts";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_PROMPT_PATH: &str = "prompts/crime_prompt.txt";
pub const DEFAULT_STORIES_DIR: &str = "data/stories";
pub const DEFAULT_AUDIO_DIR: &str = "data/audio";
pub const DEFAULT_LOG_FILE: &str = "bot.log";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const API_KEY_VAR: &str = "OPENAI_API_KEY";
const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// Immutable settings shared by both pipeline stages.
///
/// Built once at startup by [`Config::from_env`]; the `with_*` methods
/// consume and return the config so overrides are applied before any stage
/// sees it.
#[derive(Clone)]
pub struct Config {
    api_key: String,
    base_url: String,
    story_model: String,
    temperature: f64,
    speech_model: String,
    voice: Voice,
    prompt_path: PathBuf,
    stories_dir: PathBuf,
    audio_dir: PathBuf,
    timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("story_model", &self.story_model)
            .field("temperature", &self.temperature)
            .field("speech_model", &self.speech_model)
            .field("voice", &self.voice)
            .field("prompt_path", &self.prompt_path)
            .field("stories_dir", &self.stories_dir)
            .field("audio_dir", &self.audio_dir)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Create a config with the given key and every other field defaulted.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            story_model: DEFAULT_STORY_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            speech_model: DEFAULT_SPEECH_MODEL.to_string(),
            voice: Voice::default(),
            prompt_path: PathBuf::from(DEFAULT_PROMPT_PATH),
            stories_dir: PathBuf::from(DEFAULT_STORIES_DIR),
            audio_dir: PathBuf::from(DEFAULT_AUDIO_DIR),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Load from the process environment (`OPENAI_API_KEY`, `OPENAI_BASE_URL`).
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                StoryError::Configuration(format!(
                    "{API_KEY_VAR} not found in environment or .env file"
                ))
            })?;

        let mut config = Self::new(api_key);
        if let Some(url) = lookup(BASE_URL_VAR).filter(|url| !url.trim().is_empty()) {
            config.base_url = url;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_story_model(mut self, model: impl Into<String>) -> Self {
        self.story_model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_speech_model(mut self, model: impl Into<String>) -> Self {
        self.speech_model = model.into();
        self
    }

    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_prompt_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.prompt_path = path.into();
        self
    }

    pub fn with_stories_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.stories_dir = dir.into();
        self
    }

    pub fn with_audio_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.audio_dir = dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn story_model(&self) -> &str {
        &self.story_model
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn speech_model(&self) -> &str {
        &self.speech_model
    }

    pub fn voice(&self) -> Voice {
        self.voice
    }

    pub fn prompt_path(&self) -> &Path {
        &self.prompt_path
    }

    pub fn stories_dir(&self) -> &Path {
        &self.stories_dir
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
