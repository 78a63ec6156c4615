//! Bounded subtitle display log.
//!
//! Pure data structure: the pipeline emits entries over a channel and
//! whichever consumer drains that channel owns the log. No display
//! technology is assumed here.

use std::collections::VecDeque;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// One finalized subtitle line. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    /// Wall-clock time the line was produced (not stream time).
    pub timestamp: SystemTime,
    /// Translated text, or the original recognized text on fallback.
    pub text: String,
    /// False when translation was skipped or failed.
    pub translated: bool,
}

impl SubtitleEntry {
    /// Creates an entry stamped with the current wall-clock time.
    pub fn now(text: String, translated: bool) -> Self {
        Self {
            timestamp: SystemTime::now(),
            text,
            translated,
        }
    }

    /// Renders the entry as a display line: `[HH:MM:SS] text`, with an
    /// annotation when the line carries untranslated fallback text.
    pub fn display_line(&self) -> String {
        let clock = format_clock(self.timestamp);
        if self.translated {
            format!("[{}] {}", clock, self.text)
        } else {
            format!("[{}] {} (untranslated)", clock, self.text)
        }
    }
}

/// Formats a wall-clock time as UTC `HH:MM:SS`.
fn format_clock(time: SystemTime) -> String {
    let since_epoch = time
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs();
    let secs_of_day = since_epoch % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        secs_of_day / 3_600,
        (secs_of_day % 3_600) / 60,
        secs_of_day % 60
    )
}

/// Ordered, capacity-bounded log of subtitle entries.
///
/// When the line count exceeds `max_lines`, the oldest `trim_lines` entries
/// are removed in one step. Block trimming amortizes eviction cost instead
/// of paying it on every insert.
#[derive(Debug)]
pub struct SubtitleLog {
    entries: VecDeque<SubtitleEntry>,
    max_lines: usize,
    trim_lines: usize,
}

impl SubtitleLog {
    /// Creates an empty log with the given capacity and trim block size.
    pub fn new(max_lines: usize, trim_lines: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_lines + 1),
            max_lines,
            trim_lines: trim_lines.min(max_lines),
        }
    }

    /// Appends an entry, evicting the oldest block if the cap is exceeded.
    pub fn push(&mut self, entry: SubtitleEntry) {
        self.entries.push_back(entry);
        if self.entries.len() > self.max_lines {
            self.entries.drain(..self.trim_lines);
        }
    }

    /// Ordered view of the retained entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &SubtitleEntry> {
        self.entries.iter()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str) -> SubtitleEntry {
        SubtitleEntry::now(text.to_string(), true)
    }

    #[test]
    fn test_push_appends_in_order() {
        let mut log = SubtitleLog::new(100, 20);
        log.push(entry("one"));
        log.push(entry("two"));

        let texts: Vec<&str> = log.entries().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_eviction_removes_oldest_block_in_one_step() {
        let mut log = SubtitleLog::new(100, 20);
        for i in 0..100 {
            log.push(entry(&format!("line {}", i)));
        }
        assert_eq!(log.len(), 100);

        // The 101st insert trips the cap: 100 + 1 - 20 = 81 remain.
        log.push(entry("line 100"));
        assert_eq!(log.len(), 81);

        // The oldest 20 are gone; order is preserved for the rest.
        let first = log.entries().next().unwrap();
        assert_eq!(first.text, "line 20");
        let last = log.entries().last().unwrap();
        assert_eq!(last.text, "line 100");
    }

    #[test]
    fn test_no_eviction_at_exact_cap() {
        let mut log = SubtitleLog::new(3, 2);
        log.push(entry("a"));
        log.push(entry("b"));
        log.push(entry("c"));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_trim_larger_than_cap_is_clamped() {
        let mut log = SubtitleLog::new(2, 10);
        log.push(entry("a"));
        log.push(entry("b"));
        log.push(entry("c"));
        // Trim clamps to max_lines: 3 - 2 = 1 entry remains.
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries().next().unwrap().text, "c");
    }

    #[test]
    fn test_display_line_translated() {
        let entry = SubtitleEntry {
            timestamp: UNIX_EPOCH + Duration::from_secs(3_661),
            text: "merhaba".to_string(),
            translated: true,
        };
        assert_eq!(entry.display_line(), "[01:01:01] merhaba");
    }

    #[test]
    fn test_display_line_untranslated_is_annotated() {
        let entry = SubtitleEntry {
            timestamp: UNIX_EPOCH + Duration::from_secs(45_296),
            text: "hello".to_string(),
            translated: false,
        };
        assert_eq!(entry.display_line(), "[12:34:56] hello (untranslated)");
    }

    #[test]
    fn test_format_clock_wraps_at_midnight() {
        assert_eq!(format_clock(UNIX_EPOCH + Duration::from_secs(86_400)), "00:00:00");
        assert_eq!(format_clock(UNIX_EPOCH + Duration::from_secs(86_399)), "23:59:59");
    }

    #[test]
    fn test_empty_log() {
        let log = SubtitleLog::new(10, 2);
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }
}
