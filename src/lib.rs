//! crimecast: write a crime story with an LLM, then narrate it.
//!
//! The pipeline has two stages run strictly in sequence:
//!
//! 1. load `prompts/crime_prompt.txt`, ask the chat model for a story and
//!    save it under `data/stories/`;
//! 2. stream a text-to-speech rendering of that story into `data/audio/`.
//!
//! ```no_run
//! use crimecast::config::Config;
//! use crimecast::pipeline::Pipeline;
//!
//! # async fn example() -> crimecast::error::Result<()> {
//! let config = Config::from_env()?;
//! let report = Pipeline::openai(&config).run().await;
//! println!("{report:?}");
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod logging;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod storage;
pub mod util;
