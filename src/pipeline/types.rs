//! Data types flowing through the subtitle pipeline.

use crate::subtitles::SubtitleEntry;

/// A chunk of raw audio bytes as read from the capture process.
///
/// Chunks have arbitrary length and are never reordered; the sequence number
/// exists for gap diagnostics, not reassembly.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Raw PCM bytes (16-bit signed little-endian, mono, 16kHz).
    pub bytes: Vec<u8>,
    /// Sequence number assigned at capture time.
    pub sequence: u64,
}

impl AudioChunk {
    /// Creates a new audio chunk.
    pub fn new(bytes: Vec<u8>, sequence: u64) -> Self {
        Self { bytes, sequence }
    }
}

/// A fixed-size slice of audio handed to the recognizer in one call.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw PCM bytes, exactly one frame's worth.
    pub bytes: Vec<u8>,
}

impl AudioFrame {
    /// Creates a new audio frame.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Frame payload viewed as 16-bit signed little-endian samples.
    ///
    /// A trailing odd byte (malformed input) is ignored.
    pub fn samples(&self) -> Vec<i16> {
        self.bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }
}

/// Output of one recognizer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionResult {
    /// Provisional hypothesis, superseded by any later result.
    Partial(String),
    /// Terminal text for one utterance. Never revised.
    Final(String),
}

/// Pipeline lifecycle state, owned by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running,
    Stopping,
}

/// Events emitted by the pipeline for a downstream consumer.
///
/// The consumer that drains these is the single writer into the subtitle
/// log; the pipeline itself never touches shared display state.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// A finalized, translated-or-fallback subtitle line.
    Subtitle(SubtitleEntry),
    /// Best-effort partial hypothesis status. Never enters the log.
    PartialStatus(String),
    /// The capture source reached end of stream; the pipeline is stopping.
    StreamEnded,
}
