//! Two-relay subtitle pipeline.
//!
//! A capture relay drains raw audio from the byte source into a bounded
//! chunk queue; a subtitle relay assembles frames, runs recognition,
//! translates finalized utterances and emits display events. Each relay
//! runs in its own thread and observes a shared cancellation token.

pub mod accumulator;
pub mod cancel;
pub mod coordinator;
pub mod reporter;
pub mod types;
pub mod worker;

pub use accumulator::FrameAccumulator;
pub use cancel::CancellationToken;
pub use coordinator::{Pipeline, PipelineConfig, PipelineHandle};
pub use reporter::{ErrorReporter, LogReporter, RelayError};
pub use types::{AudioChunk, AudioFrame, PipelineEvent, PipelineState, RecognitionResult};
pub use worker::{SubtitleWorker, WorkerConfig};
