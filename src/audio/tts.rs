//! Text-to-speech trait.

use std::path::Path;

use async_trait::async_trait;

use crate::error::StoryError;

/// Trait for text-to-speech providers that write straight to disk.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` into `path`, returning the number of bytes written.
    ///
    /// On error no file is left at `path`.
    async fn synthesize_to_file(&self, text: &str, path: &Path) -> Result<u64, StoryError>;
}
