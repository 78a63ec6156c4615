//! Vosk-backed streaming recognizer.

use crate::defaults;
use crate::error::{Result, StreamsubError};
use crate::pipeline::types::{AudioFrame, RecognitionResult};
use crate::recognize::SpeechRecognizer;
use std::path::Path;
use vosk::{DecodingState, Model, Recognizer};

/// Streaming recognizer wrapping a Kaldi decoder via libvosk.
///
/// The decoder keeps utterance state across `feed` calls and resets itself
/// whenever it reports a finalized result.
pub struct VoskRecognizer {
    recognizer: Recognizer,
}

impl VoskRecognizer {
    /// Loads the model at `model_path` and builds a recognizer for the
    /// pipeline's fixed sample rate.
    ///
    /// Fails with `EngineNotReady` when the model directory is missing or
    /// cannot be loaded; the pipeline refuses to start in that case.
    pub fn load(model_path: &Path) -> Result<Self> {
        if !model_path.is_dir() {
            return Err(StreamsubError::EngineNotReady {
                message: format!("model directory not found at {}", model_path.display()),
            });
        }

        let model_path_str = model_path.to_string_lossy().into_owned();
        let model =
            Model::new(model_path_str.clone()).ok_or_else(|| StreamsubError::EngineNotReady {
                message: format!("failed to load model from {}", model_path_str),
            })?;

        let recognizer = Recognizer::new(&model, defaults::SAMPLE_RATE as f32).ok_or_else(|| {
            StreamsubError::EngineNotReady {
                message: "failed to create recognizer".to_string(),
            }
        })?;

        Ok(Self { recognizer })
    }
}

impl SpeechRecognizer for VoskRecognizer {
    fn feed(&mut self, frame: &AudioFrame) -> Result<RecognitionResult> {
        let samples = frame.samples();
        let state = self
            .recognizer
            .accept_waveform(&samples)
            .map_err(|e| StreamsubError::Recognition {
                message: format!("decoder rejected waveform: {e}"),
            })?;

        match state {
            DecodingState::Finalized => {
                let text = self
                    .recognizer
                    .result()
                    .single()
                    .map(|r| r.text.to_string())
                    .unwrap_or_default();
                Ok(RecognitionResult::Final(text))
            }
            DecodingState::Running => Ok(RecognitionResult::Partial(
                self.recognizer.partial_result().partial.to_string(),
            )),
            DecodingState::Failed => Err(StreamsubError::Recognition {
                message: "decoder entered failed state".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_model_is_engine_not_ready() {
        let result = VoskRecognizer::load(Path::new("/nonexistent/vosk-model"));
        match result {
            Err(StreamsubError::EngineNotReady { message }) => {
                assert!(message.contains("/nonexistent/vosk-model"));
            }
            _ => panic!("Expected EngineNotReady"),
        }
    }
}
