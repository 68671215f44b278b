//! Shared test helpers: stub stages and a log capture buffer.
#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

use crimecast::audio::SpeechSynthesizer;
use crimecast::error::StoryError;
use crimecast::generation::StoryGenerator;
use crimecast::pipeline::Clock;

/// A generator that returns queued results in order, then a fixed fallback.
pub struct StubGenerator {
    results: Mutex<Vec<Result<String, StoryError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl StubGenerator {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn returning(story: &str) -> Self {
        let stub = Self::new();
        stub.queue(Ok(story.to_string()));
        stub
    }

    pub fn failing(err: StoryError) -> Self {
        let stub = Self::new();
        stub.queue(Err(err));
        stub
    }

    pub fn queue(&self, result: Result<String, StoryError>) {
        self.results.lock().unwrap().push(result);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl StoryGenerator for StubGenerator {
    async fn generate_story(&self, prompt: &str) -> Result<String, StoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut results = self.results.lock().unwrap();
        if results.is_empty() {
            return Ok("Stub story".to_string());
        }
        results.remove(0)
    }
}

/// A synthesizer that writes fixed bytes, or fails without writing.
pub struct StubSynthesizer {
    audio: Option<Vec<u8>>,
    texts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl StubSynthesizer {
    pub fn writing(audio: &[u8]) -> Self {
        Self {
            audio: Some(audio.to_vec()),
            texts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            audio: None,
            texts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_text(&self) -> Option<String> {
        self.texts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SpeechSynthesizer for StubSynthesizer {
    async fn synthesize_to_file(&self, text: &str, path: &Path) -> Result<u64, StoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.lock().unwrap().push(text.to_string());
        match self.audio {
            Some(ref audio) => {
                std::fs::write(path, audio).map_err(|e| StoryError::io(path, e))?;
                Ok(audio.len() as u64)
            }
            None => Err(StoryError::api(503, "speech service unavailable")),
        }
    }
}

/// A clock frozen at one instant, so every save in a run shares a timestamp.
pub fn frozen_clock(at: DateTime<Local>) -> Clock {
    Arc::new(move || at)
}

pub fn fixed_time() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 11, 2, 23, 59, 7).unwrap()
}

/// Write `contents` to `<dir>/prompt.txt` and return the path.
pub fn write_prompt(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("prompt.txt");
    std::fs::write(&path, contents).unwrap();
    path
}

/// Sorted file names in `dir`, or empty if it does not exist.
pub fn file_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// In-memory log sink using the same line format as `bot.log`.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    /// Route this thread's events into the capture until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        let writer = self.clone();
        tracing::subscriber::set_default(crimecast::logging::subscriber(
            move || writer.clone(),
            EnvFilter::new("info"),
        ))
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines_at(&self, level: &str) -> Vec<String> {
        let tag = format!("[{level}]");
        self.contents()
            .lines()
            .filter(|line| line.contains(&tag))
            .map(ToString::to_string)
            .collect()
    }
}
