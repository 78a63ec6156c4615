//! Command-line interface for streamsub
//!
//! Provides argument parsing using clap derive macros.

use clap::Parser;
use std::path::PathBuf;

/// Live translated subtitles for media streams
#[derive(Parser, Debug)]
#[command(
    name = "streamsub",
    version,
    about = "Live translated subtitles for media streams"
)]
pub struct Cli {
    /// Resolved stream URL fed to the capture process
    #[arg(value_name = "URL")]
    pub url: String,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to the speech recognition model directory
    #[arg(long, value_name = "DIR")]
    pub model: Option<PathBuf>,

    /// Translation API key (overrides config and STREAMSUB_API_KEY)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Target language code for translation (e.g. EN, TR, DE)
    #[arg(long, value_name = "LANG")]
    pub target_lang: Option<String>,

    /// Disable translation even when an API key is configured
    #[arg(long)]
    pub no_translate: bool,

    /// Maximum subtitle lines retained in the display log
    #[arg(long, value_name = "LINES")]
    pub max_lines: Option<usize>,

    /// Suppress partial-hypothesis status output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Default config file location (`~/.config/streamsub/config.toml`).
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("streamsub")
        .join("config.toml")
}
