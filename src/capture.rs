//! Audio capture via an external process.
//!
//! The capture tool (ffmpeg) receives a resolved media URL and emits raw PCM
//! on stdout (mono, 16-bit, 16kHz, WAV framing). This module is the only
//! place the pipeline touches OS process lifecycle.

use crate::config::CaptureConfig;
use crate::defaults;
use crate::error::{Result, StreamsubError};
use std::collections::VecDeque;
use std::io::Read;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// A producer of raw audio bytes.
///
/// Implementations are consumed by a single capture relay; termination is
/// exposed separately through [`SourceStop`] so a blocked read can be
/// unblocked from another thread during shutdown.
pub trait ByteSource: Send {
    /// Reads up to `max_bytes` of audio.
    ///
    /// Returns `Ok(None)` on end of stream. Blocks until data is available.
    fn read_chunk(&mut self, max_bytes: usize) -> Result<Option<Vec<u8>>>;

    /// Returns a handle that can terminate this source from any thread.
    fn stopper(&self) -> Box<dyn SourceStop>;
}

/// Thread-safe termination handle for a [`ByteSource`].
pub trait SourceStop: Send + Sync {
    /// Terminates the source. Idempotent; safe when already stopped.
    fn stop(&self);
}

/// Byte source backed by a spawned ffmpeg process decoding a stream URL.
pub struct FfmpegSource {
    stdout: ChildStdout,
    child: Arc<Mutex<Option<Child>>>,
    stop_timeout: Duration,
}

impl FfmpegSource {
    /// Locates a working ffmpeg binary.
    ///
    /// Probes the explicit override first, then the PATH, by running
    /// `ffmpeg -version`.
    pub fn locate(override_path: Option<&str>) -> Result<String> {
        let candidate = override_path.unwrap_or("ffmpeg");
        let probe = Command::new(candidate)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match probe {
            Ok(status) if status.success() => Ok(candidate.to_string()),
            _ => Err(StreamsubError::CaptureToolMissing {
                tool: candidate.to_string(),
            }),
        }
    }

    /// Spawns ffmpeg against `url`, decoding to mono 16-bit 16kHz WAV on
    /// stdout.
    pub fn spawn(config: &CaptureConfig, url: &str) -> Result<Self> {
        let ffmpeg = Self::locate(config.ffmpeg_path.as_deref())?;
        let sample_rate = defaults::SAMPLE_RATE.to_string();

        let mut child = Command::new(&ffmpeg)
            .args([
                "-i", url, "-f", "wav", "-acodec", "pcm_s16le", "-ar", &sample_rate, "-ac", "1",
                "-loglevel", "quiet", "-",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| StreamsubError::CaptureSpawn {
                message: e.to_string(),
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| StreamsubError::CaptureSpawn {
                message: "capture process has no stdout".to_string(),
            })?;

        Ok(Self {
            stdout,
            child: Arc::new(Mutex::new(Some(child))),
            stop_timeout: Duration::from_secs(config.stop_timeout_secs),
        })
    }
}

impl ByteSource for FfmpegSource {
    fn read_chunk(&mut self, max_bytes: usize) -> Result<Option<Vec<u8>>> {
        let mut buf = vec![0u8; max_bytes];
        let n = self.stdout.read(&mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some(buf))
    }

    fn stopper(&self) -> Box<dyn SourceStop> {
        Box::new(ProcessStopper {
            child: Arc::clone(&self.child),
            stop_timeout: self.stop_timeout,
        })
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        self.stopper().stop();
    }
}

/// Terminates the ffmpeg child: graceful signal first, kill after a bounded
/// wait.
struct ProcessStopper {
    child: Arc<Mutex<Option<Child>>>,
    stop_timeout: Duration,
}

impl SourceStop for ProcessStopper {
    fn stop(&self) {
        let mut guard = match self.child.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Taking the child makes repeated stops no-ops.
        if let Some(mut child) = guard.take() {
            terminate_child(&mut child, self.stop_timeout);
        }
    }
}

fn terminate_child(child: &mut Child, timeout: Duration) {
    #[cfg(unix)]
    unsafe {
        libc::kill(child.id() as libc::pid_t, libc::SIGTERM);
    }

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) => {
                if Instant::now() >= deadline {
                    break;
                }
                thread::sleep(Duration::from_millis(50));
            }
            Err(_) => break,
        }
    }

    let _ = child.kill();
    let _ = child.wait();
}

/// Scripted byte source for tests.
///
/// Yields its chunks in order, then end-of-stream; with
/// `block_until_stopped` it instead blocks after the last chunk until the
/// stopper fires, which exercises shutdown-while-reading paths.
pub struct MockByteSource {
    chunks: VecDeque<Vec<u8>>,
    block_until_stopped: bool,
    stopped: Arc<AtomicBool>,
    stop_calls: Arc<AtomicUsize>,
}

impl MockByteSource {
    /// Creates a mock that yields `chunks` then end-of-stream.
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks: chunks.into(),
            block_until_stopped: false,
            stopped: Arc::new(AtomicBool::new(false)),
            stop_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// After the scripted chunks, block reads until the stopper is called.
    pub fn with_blocking_tail(mut self) -> Self {
        self.block_until_stopped = true;
        self
    }

    /// Number of times the stopper has been invoked.
    pub fn stop_call_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.stop_calls)
    }
}

impl ByteSource for MockByteSource {
    fn read_chunk(&mut self, max_bytes: usize) -> Result<Option<Vec<u8>>> {
        if self.stopped.load(Ordering::SeqCst) {
            return Ok(None);
        }
        if let Some(mut chunk) = self.chunks.pop_front() {
            chunk.truncate(max_bytes);
            return Ok(Some(chunk));
        }
        if self.block_until_stopped {
            while !self.stopped.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(5));
            }
        }
        Ok(None)
    }

    fn stopper(&self) -> Box<dyn SourceStop> {
        Box::new(MockStopper {
            stopped: Arc::clone(&self.stopped),
            stop_calls: Arc::clone(&self.stop_calls),
        })
    }
}

struct MockStopper {
    stopped: Arc<AtomicBool>,
    stop_calls: Arc<AtomicUsize>,
}

impl SourceStop for MockStopper {
    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
    }
}
