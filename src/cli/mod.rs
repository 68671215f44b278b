//! Command-line overrides for the default run.
//!
//! Running with no arguments uses the defaults from [`crate::config`].

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::audio::Voice;
use crate::config::{Config, DEFAULT_LOG_FILE};

/// Generate a crime story and narrate it.
#[derive(Parser, Debug)]
#[command(name = "crimecast", version, about = "Generate a crime story and narrate it")]
pub struct Cli {
    /// Prompt template file
    #[arg(long)]
    pub prompt: Option<PathBuf>,

    /// Directory for generated stories
    #[arg(long)]
    pub stories_dir: Option<PathBuf>,

    /// Directory for generated audio
    #[arg(long)]
    pub audio_dir: Option<PathBuf>,

    /// Log file (appended to)
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Chat model used to write the story
    #[arg(long)]
    pub model: Option<String>,

    /// Text-to-speech model
    #[arg(long)]
    pub speech_model: Option<String>,

    /// Narrator voice (alloy, ash, ballad, coral, echo, fable, nova, onyx, sage, shimmer, verse)
    #[arg(long)]
    pub voice: Option<Voice>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    /// Apply any flags that were given on top of `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(ref path) = self.prompt {
            config = config.with_prompt_path(path);
        }
        if let Some(ref dir) = self.stories_dir {
            config = config.with_stories_dir(dir);
        }
        if let Some(ref dir) = self.audio_dir {
            config = config.with_audio_dir(dir);
        }
        if let Some(ref model) = self.model {
            config = config.with_story_model(model);
        }
        if let Some(ref model) = self.speech_model {
            config = config.with_speech_model(model);
        }
        if let Some(voice) = self.voice {
            config = config.with_voice(voice);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}
