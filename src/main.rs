use anyhow::{Context, Result, bail};
use clap::Parser;
use crossbeam_channel::unbounded;
use owo_colors::OwoColorize;
use std::path::Path;
use streamsub::capture::FfmpegSource;
use streamsub::cli::{Cli, default_config_path};
use streamsub::config::Config;
use streamsub::pipeline::{Pipeline, PipelineConfig, PipelineEvent};
use streamsub::recognize::SpeechRecognizer;
use streamsub::subtitles::SubtitleLog;
use streamsub::translate::{DeepLTranslator, Translator};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = Config::load_or_default(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?
        .with_env_overrides();

    // CLI flags win over config and environment.
    if let Some(model) = &cli.model {
        config.recognition.model_path = model.display().to_string();
    }
    if let Some(key) = &cli.api_key {
        config.translation.api_key = Some(key.clone());
    }
    if let Some(lang) = &cli.target_lang {
        config.translation.target_language = lang.clone();
    }
    if let Some(max_lines) = cli.max_lines {
        config.subtitles.max_lines = max_lines;
    }

    run(&cli, &config)
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    // All-or-nothing activation: every collaborator is checked before any
    // pipeline thread spawns.
    if config.recognition.model_path.is_empty() {
        bail!("no recognition model configured; pass --model or set STREAMSUB_MODEL");
    }
    let recognizer = build_recognizer(Path::new(&config.recognition.model_path))?;

    let translator: Option<Box<dyn Translator>> = if cli.no_translate {
        eprintln!("{}", "Translation disabled; showing recognized text".dimmed());
        None
    } else if config.translation.api_key.is_some() {
        Some(Box::new(DeepLTranslator::from_config(&config.translation)?))
    } else {
        eprintln!(
            "{}",
            "No translation API key configured; showing recognized text".dimmed()
        );
        None
    };

    let source = FfmpegSource::spawn(&config.capture, &cli.url)?;

    let (events_tx, events_rx) = unbounded();
    let mut handle = Pipeline::new(PipelineConfig::from_config(config)).start(
        source,
        recognizer,
        translator,
        events_tx,
    )?;

    eprintln!("{}", format!("Capturing {}", cli.url).green());

    let mut log = SubtitleLog::new(config.subtitles.max_lines, config.subtitles.trim_lines);
    // This loop is the single writer into the subtitle log. StreamEnded can
    // arrive ahead of subtitles still in flight through recognition, so the
    // loop keeps draining until both relays have exited and the channel
    // disconnects.
    while let Ok(event) = events_rx.recv() {
        match event {
            PipelineEvent::Subtitle(entry) => {
                println!("{}", entry.display_line());
                log.push(entry);
            }
            PipelineEvent::PartialStatus(text) => {
                if !cli.quiet {
                    eprintln!("{}", format!("… {text}").dimmed());
                }
            }
            PipelineEvent::StreamEnded => {
                eprintln!("{}", "Stream ended".yellow());
            }
        }
    }

    handle.stop();
    Ok(())
}

#[cfg(feature = "vosk")]
fn build_recognizer(model_path: &Path) -> Result<Box<dyn SpeechRecognizer>> {
    use streamsub::recognize::VoskRecognizer;
    Ok(Box::new(VoskRecognizer::load(model_path)?))
}

#[cfg(not(feature = "vosk"))]
fn build_recognizer(_model_path: &Path) -> Result<Box<dyn SpeechRecognizer>> {
    bail!("this build has no speech recognition backend; rebuild with --features vosk")
}
