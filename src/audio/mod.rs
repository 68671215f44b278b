//! Speech synthesis: the text-to-speech seam and its OpenAI implementation.

pub mod openai;
pub mod tts;
pub mod types;

pub use openai::OpenAiSpeechSynthesizer;
pub use tts::SpeechSynthesizer;
pub use types::*;
