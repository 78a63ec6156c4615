//! Translation of finalized utterances.
//!
//! Translation failures are always recovered by the caller: the original
//! recognized text is displayed instead, annotated as untranslated. When no
//! backend is configured the gateway is bypassed entirely and no network
//! call is ever attempted.

pub mod deepl;

use crate::error::{Result, StreamsubError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub use deepl::DeepLTranslator;

/// Trait for text translation backends.
pub trait Translator: Send {
    /// Translates `text` into `target_lang`.
    ///
    /// Must return within the backend's configured timeout; a hung call
    /// would otherwise stall subtitle delivery.
    fn translate(&self, text: &str, target_lang: &str) -> Result<String>;
}

/// Scripted translator for tests.
pub struct MockTranslator {
    should_fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockTranslator {
    /// Creates a mock that uppercases its input, tagged with the target
    /// language.
    pub fn new() -> Self {
        Self {
            should_fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Configure the mock to fail on every call.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Shared counter of translate calls.
    pub fn call_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for MockTranslator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(StreamsubError::Translation {
                message: "mock translation failure".to_string(),
            });
        }
        Ok(format!("[{}] {}", target_lang, text.to_uppercase()))
    }
}
