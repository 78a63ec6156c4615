//! Subtitle relay: frames chunks, runs recognition, translates finals and
//! emits pipeline events.

use crate::pipeline::accumulator::FrameAccumulator;
use crate::pipeline::cancel::CancellationToken;
use crate::pipeline::reporter::{ErrorReporter, RelayError};
use crate::pipeline::types::{AudioChunk, PipelineEvent, RecognitionResult};
use crate::recognize::SpeechRecognizer;
use crate::subtitles::SubtitleEntry;
use crate::translate::Translator;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

/// How long the relay waits on the chunk queue before re-checking
/// cancellation.
const RECV_TIMEOUT: Duration = Duration::from_millis(100);

/// Tuning for the subtitle relay.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Recognition frame size in bytes.
    pub frame_bytes: usize,
    /// Minimum characters before a partial hypothesis is surfaced.
    pub min_partial_chars: usize,
    /// Target language for translation.
    pub target_language: String,
}

/// Single-consumer stage that owns the recognizer.
///
/// The recognizer carries decoder state across frames, so exactly one worker
/// ever feeds it; chunks arrive over a channel in strict FIFO order, which
/// keeps subtitle order aligned with chunk arrival order end to end.
pub struct SubtitleWorker {
    accumulator: FrameAccumulator,
    recognizer: Box<dyn SpeechRecognizer>,
    translator: Option<Box<dyn Translator>>,
    config: WorkerConfig,
    events: Sender<PipelineEvent>,
    reporter: Arc<dyn ErrorReporter>,
}

impl SubtitleWorker {
    pub fn new(
        recognizer: Box<dyn SpeechRecognizer>,
        translator: Option<Box<dyn Translator>>,
        config: WorkerConfig,
        events: Sender<PipelineEvent>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            accumulator: FrameAccumulator::new(config.frame_bytes),
            recognizer,
            translator,
            config,
            events,
            reporter,
        }
    }

    /// Relay loop: drain chunks until cancelled or the queue disconnects.
    ///
    /// Cancellation is checked before every receive, so the relay exits
    /// within one receive timeout of the signal no matter how much audio is
    /// still queued. Natural end-of-stream is signalled by the capture relay
    /// dropping its sender instead; the channel hands over its buffered
    /// chunks before reporting the disconnect, so no queued audio is lost
    /// on that path. A fatal recognition error cancels the token so the
    /// capture relay winds down as well.
    pub fn run(mut self, chunks: Receiver<AudioChunk>, token: CancellationToken) {
        loop {
            if token.is_cancelled() {
                break;
            }
            match chunks.recv_timeout(RECV_TIMEOUT) {
                Ok(chunk) => {
                    if self.handle_chunk(chunk).is_err() {
                        token.cancel();
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    /// Buffers one chunk and processes any frames it completes.
    ///
    /// Returns `Err` only for engine failure, which is fatal to the
    /// pipeline; everything else is recovered here.
    pub fn handle_chunk(&mut self, chunk: AudioChunk) -> Result<(), ()> {
        self.accumulator.push(&chunk);
        while let Some(frame) = self.accumulator.try_take_frame() {
            let result = match self.recognizer.feed(&frame) {
                Ok(result) => result,
                Err(e) => {
                    self.reporter
                        .report("subtitle", &RelayError::Fatal(e.to_string()));
                    return Err(());
                }
            };
            match result {
                RecognitionResult::Partial(text) => self.handle_partial(text),
                RecognitionResult::Final(text) => self.handle_final(text),
            }
        }
        Ok(())
    }

    /// Surfaces a partial hypothesis unless it is below the noise threshold.
    fn handle_partial(&self, text: String) {
        if text.chars().count() >= self.config.min_partial_chars {
            let _ = self.events.send(PipelineEvent::PartialStatus(text));
        }
    }

    /// Translates a finalized utterance and emits a subtitle entry.
    ///
    /// Translation failure falls back to the original text, annotated as
    /// untranslated; it never stops the pipeline.
    fn handle_final(&self, text: String) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let (display_text, translated) = match &self.translator {
            Some(translator) => {
                match translator.translate(text, &self.config.target_language) {
                    Ok(translated_text) => (translated_text, true),
                    Err(e) => {
                        self.reporter
                            .report("subtitle", &RelayError::Recoverable(e.to_string()));
                        (text.to_string(), false)
                    }
                }
            }
            None => (text.to_string(), false),
        };

        let _ = self
            .events
            .send(PipelineEvent::Subtitle(SubtitleEntry::now(
                display_text,
                translated,
            )));
    }
}
