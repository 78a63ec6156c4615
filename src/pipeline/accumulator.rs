//! Accumulates variable-sized audio chunks into fixed-size recognition frames.

use crate::pipeline::types::{AudioChunk, AudioFrame};

/// Byte buffer that assembles arbitrary-sized chunks into frames of a fixed
/// target size, preserving byte order exactly.
///
/// No frame is emitted until a full frame's worth of bytes has arrived; any
/// remainder is retained for the next frame. The buffer itself is unbounded —
/// backpressure is applied upstream at the chunk queue.
#[derive(Debug)]
pub struct FrameAccumulator {
    buffer: Vec<u8>,
    frame_bytes: usize,
}

impl FrameAccumulator {
    /// Creates an accumulator producing frames of `frame_bytes` bytes.
    pub fn new(frame_bytes: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(frame_bytes * 2),
            frame_bytes,
        }
    }

    /// Appends a chunk's bytes to the buffer.
    pub fn push(&mut self, chunk: &AudioChunk) {
        self.buffer.extend_from_slice(&chunk.bytes);
    }

    /// Removes and returns one frame if the buffer holds at least a full
    /// frame, otherwise `None`.
    pub fn try_take_frame(&mut self) -> Option<AudioFrame> {
        if self.buffer.len() < self.frame_bytes {
            return None;
        }
        let frame: Vec<u8> = self.buffer.drain(..self.frame_bytes).collect();
        Some(AudioFrame::new(frame))
    }

    /// Bytes currently buffered and not yet emitted as a frame.
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Frame size in bytes.
    pub fn frame_bytes(&self) -> usize {
        self.frame_bytes
    }
}
