//! Streaming speech recognition.
//!
//! The pipeline talks to a [`SpeechRecognizer`] trait object so the Vosk
//! backend can be swapped for a mock in tests. The recognizer carries decoder
//! state across frames within one utterance and must only ever be fed from a
//! single thread.

#[cfg(feature = "vosk")]
pub mod vosk;

use crate::error::{Result, StreamsubError};
use crate::pipeline::types::{AudioFrame, RecognitionResult};
use std::collections::VecDeque;

#[cfg(feature = "vosk")]
pub use vosk::VoskRecognizer;

/// Trait for streaming speech-to-text engines.
///
/// `feed` transitions Partial → Partial → ... → Final for one contiguous
/// utterance; the engine resets its own state when a Final result is
/// produced.
pub trait SpeechRecognizer: Send {
    /// Feeds one audio frame and returns the decoder's current result.
    fn feed(&mut self, frame: &AudioFrame) -> Result<RecognitionResult>;
}

/// Scripted recognizer for tests.
///
/// Returns its scripted results in order; once exhausted it yields empty
/// partials. Can be configured to fail on every call instead.
pub struct MockRecognizer {
    script: VecDeque<RecognitionResult>,
    should_fail: bool,
    frames_fed: usize,
}

impl MockRecognizer {
    /// Creates a mock that replays `script` one result per frame.
    pub fn new(script: Vec<RecognitionResult>) -> Self {
        Self {
            script: script.into(),
            should_fail: false,
            frames_fed: 0,
        }
    }

    /// Configure the mock to fail on every `feed` call.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of frames fed so far.
    pub fn frames_fed(&self) -> usize {
        self.frames_fed
    }
}

impl SpeechRecognizer for MockRecognizer {
    fn feed(&mut self, _frame: &AudioFrame) -> Result<RecognitionResult> {
        if self.should_fail {
            return Err(StreamsubError::Recognition {
                message: "mock recognition failure".to_string(),
            });
        }
        self.frames_fed += 1;
        Ok(self
            .script
            .pop_front()
            .unwrap_or_else(|| RecognitionResult::Partial(String::new())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> AudioFrame {
        AudioFrame::new(vec![0u8; 64])
    }

    #[test]
    fn test_mock_replays_script_in_order() {
        let mut rec = MockRecognizer::new(vec![
            RecognitionResult::Partial("he".to_string()),
            RecognitionResult::Partial("hello th".to_string()),
            RecognitionResult::Final("hello there".to_string()),
        ]);

        assert_eq!(
            rec.feed(&frame()).unwrap(),
            RecognitionResult::Partial("he".to_string())
        );
        assert_eq!(
            rec.feed(&frame()).unwrap(),
            RecognitionResult::Partial("hello th".to_string())
        );
        assert_eq!(
            rec.feed(&frame()).unwrap(),
            RecognitionResult::Final("hello there".to_string())
        );
        assert_eq!(rec.frames_fed(), 3);
    }

    #[test]
    fn test_mock_exhausted_script_yields_empty_partials() {
        let mut rec = MockRecognizer::new(vec![]);
        assert_eq!(
            rec.feed(&frame()).unwrap(),
            RecognitionResult::Partial(String::new())
        );
    }

    #[test]
    fn test_mock_failure_mode() {
        let mut rec = MockRecognizer::new(vec![]).with_failure();
        match rec.feed(&frame()) {
            Err(StreamsubError::Recognition { message }) => {
                assert_eq!(message, "mock recognition failure");
            }
            other => panic!("Expected Recognition error, got {:?}", other),
        }
    }

    #[test]
    fn test_recognizer_trait_is_object_safe() {
        let mut rec: Box<dyn SpeechRecognizer> =
            Box::new(MockRecognizer::new(vec![RecognitionResult::Final(
                "boxed".to_string(),
            )]));
        assert_eq!(
            rec.feed(&frame()).unwrap(),
            RecognitionResult::Final("boxed".to_string())
        );
    }
}
