//! The story → audio pipeline and its per-stage failure policy.
//!
//! Stage one loads the prompt, generates a story and saves it. Stage two
//! synthesizes the story into an audio file. Each stage's error is logged and
//! recorded in the [`PipelineReport`]; neither escapes [`Pipeline::run`].
//! When stage one fails there is no story to narrate, so stage two is skipped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{error, info, warn};

use crate::audio::{OpenAiSpeechSynthesizer, SpeechSynthesizer};
use crate::config::Config;
use crate::error::{Result, StoryError};
use crate::generation::{OpenAiStoryGenerator, StoryGenerator};
use crate::prompt::read_prompt;
use crate::storage::{prepare_audio_path, save_story_at};

/// Source of "now" for output file names.
pub type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// Result of one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage wrote its artifact to this path.
    Completed(PathBuf),
    /// The stage failed; the error message is kept for the caller.
    Failed(String),
    /// The stage did not run.
    Skipped,
}

impl StageOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Completed(path) => Some(path.as_path()),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub story: StageOutcome,
    pub audio: StageOutcome,
}

impl PipelineReport {
    pub fn succeeded(&self) -> bool {
        self.story.is_completed() && self.audio.is_completed()
    }
}

pub struct Pipeline {
    generator: Arc<dyn StoryGenerator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    prompt_path: PathBuf,
    stories_dir: PathBuf,
    audio_dir: PathBuf,
    clock: Clock,
}

impl Pipeline {
    pub fn new(
        config: &Config,
        generator: Arc<dyn StoryGenerator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            generator,
            synthesizer,
            prompt_path: config.prompt_path().to_path_buf(),
            stories_dir: config.stories_dir().to_path_buf(),
            audio_dir: config.audio_dir().to_path_buf(),
            clock: Arc::new(Local::now),
        }
    }

    /// Pipeline backed by the OpenAI chat and speech endpoints.
    pub fn openai(config: &Config) -> Self {
        Self::new(
            config,
            Arc::new(OpenAiStoryGenerator::from_config(config)),
            Arc::new(OpenAiSpeechSynthesizer::from_config(config)),
        )
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Run both stages once. Never fails; see the returned report.
    pub async fn run(&self) -> PipelineReport {
        let (story, story_outcome) = match self.generate_and_save().await {
            Ok((story, path)) => {
                info!(path = %path.display(), "Story generated and saved");
                (Some(story), StageOutcome::Completed(path))
            }
            Err(err) => {
                log_stage_error("story", &err);
                (None, StageOutcome::Failed(err.to_string()))
            }
        };

        let audio_outcome = match story {
            Some(story) => match self.synthesize(story).await {
                Ok(path) => {
                    info!(path = %path.display(), "Generated audio file");
                    StageOutcome::Completed(path)
                }
                Err(err) => {
                    log_stage_error("speech", &err);
                    StageOutcome::Failed(err.to_string())
                }
            },
            None => {
                warn!("Skipping speech synthesis: no story was generated");
                StageOutcome::Skipped
            }
        };

        PipelineReport {
            story: story_outcome,
            audio: audio_outcome,
        }
    }

    async fn generate_and_save(&self) -> Result<(String, PathBuf)> {
        let prompt = read_prompt(&self.prompt_path).await?;
        let story = self.generator.generate_story(&prompt).await?;
        if story.trim().is_empty() {
            return Err(StoryError::InvalidResponse(
                "Generator returned an empty story".to_string(),
            ));
        }
        let path = save_story_at(&story, &self.stories_dir, (self.clock)()).await?;
        Ok((story, path))
    }

    async fn synthesize(&self, story: String) -> Result<PathBuf> {
        let path = prepare_audio_path(&self.audio_dir, (self.clock)()).await?;
        self.synthesizer.synthesize_to_file(&story, &path).await?;
        Ok(path)
    }
}

fn log_stage_error(stage: &str, err: &StoryError) {
    error!(stage, category = ?err.category(), "Error: {}", err.report());
}
