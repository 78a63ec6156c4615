//! Default configuration constants for streamsub.
//!
//! Shared between the config layer and the pipeline so tuning values have a
//! single home.

/// Audio sample rate in Hz expected from the capture process.
///
/// 16kHz is the standard for speech recognition; the capture process is told
/// to resample to this rate, so it is not configurable downstream.
pub const SAMPLE_RATE: u32 = 16000;

/// Bytes per PCM sample (16-bit signed little-endian, mono).
pub const BYTES_PER_SAMPLE: u32 = 2;

/// Default recognition frame duration in milliseconds.
///
/// ~2 seconds of audio per recognizer call. Longer frames mean fewer decoder
/// invocations but laggier partial results; shorter frames invert the trade.
/// Tuning constant with no strong rationale — kept configurable.
pub const FRAME_DURATION_MS: u32 = 2000;

/// Default read size for a single chunk from the capture process, in bytes.
pub const CHUNK_BYTES: usize = 4096;

/// Default capacity of the chunk queue between the capture and subtitle
/// relays, in chunks.
///
/// 256 chunks of 4KiB ≈ 1MiB ≈ 32 seconds of audio. When the queue is full
/// the oldest chunk is dropped so the capture relay never blocks.
pub const CHUNK_QUEUE_CAP: usize = 256;

/// Default minimum character count before a partial hypothesis is surfaced
/// as a status update.
///
/// Short partials flicker too much to be useful. Tuning constant — kept
/// configurable.
pub const MIN_PARTIAL_CHARS: usize = 20;

/// Default maximum number of subtitle entries retained in the display log.
pub const LOG_MAX_LINES: usize = 100;

/// Default number of oldest entries evicted in one step once the log
/// exceeds its maximum.
///
/// Trimming in blocks amortizes eviction instead of shifting on every insert.
pub const LOG_TRIM_LINES: usize = 20;

/// Default translation request timeout in seconds.
///
/// A hung translation call must not stall the subtitle relay beyond this.
pub const TRANSLATE_TIMEOUT_SECS: u64 = 10;

/// Default DeepL API endpoint (free tier).
pub const TRANSLATE_ENDPOINT: &str = "https://api-free.deepl.com/v2/translate";

/// Default translation target language code.
pub const TARGET_LANGUAGE: &str = "EN";

/// Seconds to wait for the capture process to exit after a graceful
/// termination request before it is killed.
pub const CAPTURE_STOP_TIMEOUT_SECS: u64 = 5;

/// Computes the recognition frame size in bytes for a frame duration.
pub const fn frame_bytes(duration_ms: u32) -> usize {
    (SAMPLE_RATE * BYTES_PER_SAMPLE * duration_ms / 1000) as usize
}
