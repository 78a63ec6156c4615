use crate::defaults;
use crate::error::{Result, StreamsubError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub recognition: RecognitionConfig,
    pub translation: TranslationConfig,
    pub subtitles: SubtitlesConfig,
}

/// Capture process configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Explicit path to ffmpeg; `None` probes the PATH.
    pub ffmpeg_path: Option<String>,
    /// Bytes read from the capture process per chunk.
    pub chunk_bytes: usize,
    /// Seconds to wait after graceful termination before killing.
    pub stop_timeout_secs: u64,
}

/// Speech recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Path to the recognizer model directory.
    pub model_path: String,
    /// Duration of one recognition frame in milliseconds.
    pub frame_duration_ms: u32,
    /// Minimum characters before a partial hypothesis is surfaced.
    pub min_partial_chars: usize,
    /// Capacity of the chunk queue between relays.
    pub chunk_queue_cap: usize,
}

/// Translation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    /// API key; `None` disables translation entirely.
    pub api_key: Option<String>,
    /// Target language code (e.g. "EN", "TR").
    pub target_language: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Translation endpoint URL.
    pub endpoint: String,
}

/// Subtitle display log configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SubtitlesConfig {
    /// Maximum entries retained in the display log.
    pub max_lines: usize,
    /// Oldest entries removed in one eviction step.
    pub trim_lines: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            chunk_bytes: defaults::CHUNK_BYTES,
            stop_timeout_secs: defaults::CAPTURE_STOP_TIMEOUT_SECS,
        }
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            model_path: String::new(),
            frame_duration_ms: defaults::FRAME_DURATION_MS,
            min_partial_chars: defaults::MIN_PARTIAL_CHARS,
            chunk_queue_cap: defaults::CHUNK_QUEUE_CAP,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            target_language: defaults::TARGET_LANGUAGE.to_string(),
            timeout_secs: defaults::TRANSLATE_TIMEOUT_SECS,
            endpoint: defaults::TRANSLATE_ENDPOINT.to_string(),
        }
    }
}

impl Default for SubtitlesConfig {
    fn default() -> Self {
        Self {
            max_lines: defaults::LOG_MAX_LINES,
            trim_lines: defaults::LOG_TRIM_LINES,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StreamsubError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                StreamsubError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't
    /// exist. Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(StreamsubError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - STREAMSUB_MODEL → recognition.model_path
    /// - STREAMSUB_API_KEY → translation.api_key
    /// - STREAMSUB_TARGET_LANG → translation.target_language
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("STREAMSUB_MODEL")
            && !model.is_empty()
        {
            self.recognition.model_path = model;
        }

        if let Ok(key) = std::env::var("STREAMSUB_API_KEY")
            && !key.is_empty()
        {
            self.translation.api_key = Some(key);
        }

        if let Ok(lang) = std::env::var("STREAMSUB_TARGET_LANG")
            && !lang.is_empty()
        {
            self.translation.target_language = lang;
        }

        self
    }
}
