//! Pipeline lifecycle: wires the capture and subtitle relays together and
//! enforces shutdown ordering.

use crate::capture::{ByteSource, SourceStop};
use crate::config::Config;
use crate::defaults;
use crate::error::Result;
use crate::pipeline::cancel::CancellationToken;
use crate::pipeline::reporter::{ErrorReporter, LogReporter, RelayError};
use crate::pipeline::types::{AudioChunk, PipelineEvent, PipelineState};
use crate::pipeline::worker::{SubtitleWorker, WorkerConfig};
use crate::recognize::SpeechRecognizer;
use crate::translate::Translator;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Configuration for the subtitle pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bytes read from the source per chunk.
    pub chunk_bytes: usize,
    /// Recognition frame size in bytes.
    pub frame_bytes: usize,
    /// Capacity of the chunk queue between the relays, in chunks.
    pub chunk_queue_cap: usize,
    /// Minimum characters before a partial hypothesis is surfaced.
    pub min_partial_chars: usize,
    /// Target language for translation.
    pub target_language: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_bytes: defaults::CHUNK_BYTES,
            frame_bytes: defaults::frame_bytes(defaults::FRAME_DURATION_MS),
            chunk_queue_cap: defaults::CHUNK_QUEUE_CAP,
            min_partial_chars: defaults::MIN_PARTIAL_CHARS,
            target_language: defaults::TARGET_LANGUAGE.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Derives pipeline tuning from the application config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            chunk_bytes: config.capture.chunk_bytes,
            frame_bytes: defaults::frame_bytes(config.recognition.frame_duration_ms),
            chunk_queue_cap: config.recognition.chunk_queue_cap,
            min_partial_chars: config.recognition.min_partial_chars,
            target_language: config.translation.target_language.clone(),
        }
    }
}

/// Handle to a running pipeline.
///
/// Dropping the handle stops the pipeline.
pub struct PipelineHandle {
    token: CancellationToken,
    stopper: Box<dyn SourceStop>,
    threads: Vec<JoinHandle<()>>,
}

impl PipelineHandle {
    /// Current lifecycle state.
    ///
    /// Relays that wound down on their own (end of stream, fatal engine
    /// error) count as Idle even before `stop` reaps the thread handles.
    pub fn state(&self) -> PipelineState {
        if self.threads.is_empty() || self.threads.iter().all(|t| t.is_finished()) {
            PipelineState::Idle
        } else if self.token.is_cancelled() {
            PipelineState::Stopping
        } else {
            PipelineState::Running
        }
    }

    /// Returns true while both relays are live and uncancelled.
    pub fn is_running(&self) -> bool {
        self.state() == PipelineState::Running
    }

    /// Stops the pipeline and waits for both relays to exit.
    ///
    /// Ordering matters: the source is asked to terminate before the relay
    /// threads are joined, so a relay blocked on a read unblocks via
    /// end-of-stream instead of waiting out the stream. Idempotent; a
    /// second call is a no-op.
    pub fn stop(&mut self) {
        self.token.cancel();
        self.stopper.stop();
        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Coordinator for the two-relay subtitle pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    reporter: Arc<dyn ErrorReporter>,
}

impl Pipeline {
    /// Creates a pipeline with the default stderr error reporter.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            reporter: Arc::new(LogReporter),
        }
    }

    /// Sets a custom error reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Starts the pipeline: capture relay feeding a bounded chunk queue,
    /// subtitle relay draining it through recognition and translation.
    ///
    /// Activation is all-or-nothing — the recognizer and source must already
    /// be constructed (their constructors fail with `EngineNotReady` /
    /// `CaptureToolMissing` respectively), and no thread is spawned if any
    /// precondition fails. Subtitle entries and status updates arrive on
    /// `events`; the receiver's owner is the single writer into any display
    /// log.
    pub fn start<S: ByteSource + 'static>(
        self,
        source: S,
        recognizer: Box<dyn SpeechRecognizer>,
        translator: Option<Box<dyn Translator>>,
        events: Sender<PipelineEvent>,
    ) -> Result<PipelineHandle> {
        let token = CancellationToken::new();
        let (chunk_tx, chunk_rx) = bounded(self.config.chunk_queue_cap);
        let stopper = source.stopper();

        let capture_handle = spawn_capture_relay(
            source,
            chunk_tx,
            chunk_rx.clone(),
            events.clone(),
            token.clone(),
            self.config.chunk_bytes,
            self.reporter.clone(),
        );

        let worker = SubtitleWorker::new(
            recognizer,
            translator,
            WorkerConfig {
                frame_bytes: self.config.frame_bytes,
                min_partial_chars: self.config.min_partial_chars,
                target_language: self.config.target_language.clone(),
            },
            events,
            self.reporter.clone(),
        );
        let worker_token = token.clone();
        let worker_handle = thread::spawn(move || worker.run(chunk_rx, worker_token));

        Ok(PipelineHandle {
            token,
            stopper,
            threads: vec![capture_handle, worker_handle],
        })
    }
}

/// Capture relay: drains the source into the chunk queue.
///
/// The relay must keep draining regardless of recognition lag, or the
/// capture process's output pipe fills up and stalls the source itself.
/// Overflow policy is drop-oldest: on a full queue the relay steals one
/// chunk back off the queue and retries, so the newest audio always wins.
fn spawn_capture_relay<S: ByteSource + 'static>(
    mut source: S,
    chunk_tx: Sender<AudioChunk>,
    chunk_rx: Receiver<AudioChunk>,
    events: Sender<PipelineEvent>,
    token: CancellationToken,
    chunk_bytes: usize,
    reporter: Arc<dyn ErrorReporter>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut sequence = 0u64;
        loop {
            if token.is_cancelled() {
                break;
            }
            match source.read_chunk(chunk_bytes) {
                Ok(Some(bytes)) => {
                    let chunk = AudioChunk::new(bytes, sequence);
                    sequence += 1;
                    if !enqueue_drop_oldest(&chunk_tx, &chunk_rx, chunk, &reporter) {
                        break;
                    }
                }
                Ok(None) => {
                    // End of stream triggers graceful shutdown, not a
                    // failure. Exiting drops the chunk sender, which lets
                    // the subtitle relay drain what is queued and stop on
                    // the disconnect. A source drained because stop()
                    // already terminated it is not reported as a stream
                    // end.
                    if !token.is_cancelled() {
                        let _ = events.send(PipelineEvent::StreamEnded);
                    }
                    break;
                }
                Err(e) => {
                    reporter.report("capture", &RelayError::Recoverable(e.to_string()));
                }
            }
        }
    })
}

/// Pushes a chunk onto the bounded queue, evicting the oldest queued chunk
/// when full. Returns false when the queue is disconnected.
fn enqueue_drop_oldest(
    chunk_tx: &Sender<AudioChunk>,
    chunk_rx: &Receiver<AudioChunk>,
    chunk: AudioChunk,
    reporter: &Arc<dyn ErrorReporter>,
) -> bool {
    let mut pending = chunk;
    loop {
        match chunk_tx.try_send(pending) {
            Ok(()) => return true,
            Err(TrySendError::Full(rejected)) => {
                if chunk_rx.try_recv().is_ok() {
                    reporter.report(
                        "capture",
                        &RelayError::Recoverable(
                            "chunk queue full; dropped oldest chunk".to_string(),
                        ),
                    );
                }
                pending = rejected;
            }
            Err(TrySendError::Disconnected(_)) => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::MockByteSource;
    use crate::pipeline::types::RecognitionResult;
    use crate::recognize::MockRecognizer;
    use crossbeam_channel::unbounded;
    use std::sync::Mutex;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    #[derive(Default)]
    struct CollectingReporter {
        errors: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl ErrorReporter for CollectingReporter {
        fn report(&self, relay: &str, error: &RelayError) {
            let mut errors = match self.errors.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            errors.push((relay.to_string(), error.to_string()));
        }
    }

    #[test]
    fn test_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.chunk_bytes, 4096);
        assert_eq!(config.frame_bytes, 64_000);
        assert_eq!(config.chunk_queue_cap, 256);
        assert_eq!(config.min_partial_chars, 20);
        assert_eq!(config.target_language, "EN");
    }

    #[test]
    fn test_config_from_app_config() {
        let mut app = Config::default();
        app.recognition.frame_duration_ms = 1000;
        app.translation.target_language = "TR".to_string();
        let config = PipelineConfig::from_config(&app);
        assert_eq!(config.frame_bytes, 32_000);
        assert_eq!(config.target_language, "TR");
    }

    #[test]
    fn test_stream_end_transitions_to_idle_and_emits_event() {
        // Source yields one frame's worth of audio then ends.
        let config = PipelineConfig {
            frame_bytes: 8,
            chunk_bytes: 8,
            ..Default::default()
        };
        let source = MockByteSource::new(vec![vec![0u8; 8]]);
        let recognizer =
            MockRecognizer::new(vec![RecognitionResult::Final("hello".to_string())]);
        let (events_tx, events_rx) = unbounded();

        let mut handle = Pipeline::new(config)
            .start(source, Box::new(recognizer), None, events_tx)
            .unwrap();

        // Both the subtitle and the end-of-stream notification arrive.
        let mut saw_subtitle = false;
        let mut saw_ended = false;
        for _ in 0..2 {
            match events_rx.recv_timeout(Duration::from_secs(2)).unwrap() {
                PipelineEvent::Subtitle(entry) => {
                    assert_eq!(entry.text, "hello");
                    saw_subtitle = true;
                }
                PipelineEvent::StreamEnded => saw_ended = true,
                PipelineEvent::PartialStatus(_) => {}
            }
        }
        assert!(saw_subtitle);
        assert!(saw_ended);

        handle.stop();
        assert_eq!(handle.state(), PipelineState::Idle);
    }

    #[test]
    fn test_stop_unblocks_blocked_capture_relay() {
        let source = MockByteSource::new(vec![]).with_blocking_tail();
        let stop_calls = source.stop_call_count();
        let recognizer = MockRecognizer::new(vec![]);
        let (events_tx, _events_rx) = unbounded();

        let mut handle = Pipeline::new(PipelineConfig::default())
            .start(source, Box::new(recognizer), None, events_tx)
            .unwrap();
        assert_eq!(handle.state(), PipelineState::Running);

        handle.stop();
        assert_eq!(handle.state(), PipelineState::Idle);
        assert!(stop_calls.load(Ordering::SeqCst) >= 1);

        // Second stop is a no-op.
        handle.stop();
        assert_eq!(handle.state(), PipelineState::Idle);
    }

    #[test]
    fn test_stop_then_start_reaches_running_again() {
        let (events_tx, _events_rx) = unbounded();
        let source = MockByteSource::new(vec![]).with_blocking_tail();
        let mut handle = Pipeline::new(PipelineConfig::default())
            .start(source, Box::new(MockRecognizer::new(vec![])), None, events_tx)
            .unwrap();
        handle.stop();

        let (events_tx, _events_rx) = unbounded();
        let source = MockByteSource::new(vec![]).with_blocking_tail();
        let mut handle = Pipeline::new(PipelineConfig::default())
            .start(source, Box::new(MockRecognizer::new(vec![])), None, events_tx)
            .unwrap();
        assert_eq!(handle.state(), PipelineState::Running);
        handle.stop();
    }

    #[test]
    fn test_engine_failure_stops_pipeline() {
        let config = PipelineConfig {
            frame_bytes: 8,
            chunk_bytes: 8,
            ..Default::default()
        };
        let source = MockByteSource::new(vec![vec![0u8; 8]]).with_blocking_tail();
        let recognizer = MockRecognizer::new(vec![]).with_failure();
        let reporter = Arc::new(CollectingReporter::default());
        let errors = reporter.errors.clone();
        let (events_tx, _events_rx) = unbounded();

        let mut handle = Pipeline::new(config)
            .with_error_reporter(reporter)
            .start(source, Box::new(recognizer), None, events_tx)
            .unwrap();

        // The fatal engine error cancels the token; both relays wind down.
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while handle.state() == PipelineState::Running && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert_ne!(handle.state(), PipelineState::Running);
        handle.stop();

        let reported = match errors.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        assert!(
            reported
                .iter()
                .any(|(relay, error)| relay == "subtitle" && error.contains("Fatal"))
        );
    }

    #[test]
    fn test_drop_oldest_keeps_capture_relay_unblocked() {
        let (chunk_tx, chunk_rx) = bounded::<AudioChunk>(2);
        let reporter: Arc<dyn ErrorReporter> = Arc::new(CollectingReporter::default());

        for sequence in 0..5 {
            let chunk = AudioChunk::new(vec![sequence as u8], sequence);
            assert!(enqueue_drop_oldest(&chunk_tx, &chunk_rx, chunk, &reporter));
        }

        // Queue holds the two newest chunks; the oldest were evicted.
        let remaining: Vec<u64> = chunk_rx.try_iter().map(|c| c.sequence).collect();
        assert_eq!(remaining, vec![3, 4]);
    }

    #[test]
    fn test_enqueue_reports_disconnect() {
        let (chunk_tx, chunk_rx) = bounded::<AudioChunk>(1);
        let reporter: Arc<dyn ErrorReporter> = Arc::new(CollectingReporter::default());
        drop(chunk_rx);
        let (_tx2, rx2) = bounded::<AudioChunk>(1);
        let chunk = AudioChunk::new(vec![0], 0);
        assert!(!enqueue_drop_oldest(&chunk_tx, &rx2, chunk, &reporter));
    }
}
