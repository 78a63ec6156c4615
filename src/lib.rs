//! streamsub - Live translated subtitles for media streams
//!
//! Captures a stream's audio through an external process, recognizes speech
//! in near real time and renders translated, timestamped subtitle lines.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod capture;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod pipeline;
pub mod recognize;
pub mod subtitles;
pub mod translate;

// Core traits (source → recognize → translate → sink)
pub use capture::{ByteSource, FfmpegSource, SourceStop};
pub use recognize::SpeechRecognizer;
pub use translate::{DeepLTranslator, Translator};

// Pipeline
pub use pipeline::{Pipeline, PipelineConfig, PipelineEvent, PipelineHandle, PipelineState};

// Subtitle log
pub use subtitles::{SubtitleEntry, SubtitleLog};

// Error handling
pub use error::{Result, StreamsubError};

// Config
pub use config::Config;
