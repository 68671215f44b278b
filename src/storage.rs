//! Timestamped output files for stories and audio.
//!
//! Names have one-second resolution. Two saves within the same second target
//! the same path and the later one overwrites the earlier.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::error::{Result, StoryError};

const FILE_PREFIX: &str = "crime_story";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub const STORY_EXTENSION: &str = "txt";
pub const AUDIO_EXTENSION: &str = "mp3";

/// `<dir>/crime_story_<YYYYMMDD_HHMMSS>.<extension>`
pub fn timestamped_path(dir: &Path, now: DateTime<Local>, extension: &str) -> PathBuf {
    dir.join(format!(
        "{FILE_PREFIX}_{}.{extension}",
        now.format(TIMESTAMP_FORMAT)
    ))
}

async fn ensure_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| StoryError::io(dir, e))
}

/// Write `story` to a new timestamped file under `dir`, stamped with the current local time.
pub async fn save_story(story: &str, dir: &Path) -> Result<PathBuf> {
    save_story_at(story, dir, Local::now()).await
}

/// Write `story` to the file named for `now`, creating `dir` if needed.
pub async fn save_story_at(story: &str, dir: &Path, now: DateTime<Local>) -> Result<PathBuf> {
    ensure_dir(dir).await?;
    let path = timestamped_path(dir, now, STORY_EXTENSION);
    tokio::fs::write(&path, story.as_bytes())
        .await
        .map_err(|e| StoryError::io(&path, e))?;
    debug!(path = %path.display(), bytes = story.len(), "Wrote story file");
    Ok(path)
}

/// Create `dir` and return the audio path for `now`. Nothing is written.
pub async fn prepare_audio_path(dir: &Path, now: DateTime<Local>) -> Result<PathBuf> {
    ensure_dir(dir).await?;
    Ok(timestamped_path(dir, now, AUDIO_EXTENSION))
}
