//! The compaction engine.
//!
//! Takes a raw transcript, an optional [`TimeWindow`] and a [`ShrinkConfig`],
//! and produces a [`ShrinkResult`]: compacted anonymized text plus summary
//! counts. The engine is a pure function of its inputs — no filesystem, no
//! network, no state shared across calls — so independent transcripts can be
//! shrunk from multiple threads with no coordination.
//!
//! # Example
//!
//! ```rust
//! use chatshrink::shrink::{shrink, ShrinkConfig};
//! use chatshrink::window::TimeWindow;
//!
//! let transcript = "12/28/2024, 10:15 AM - Alice: hello\n\
//!                   12/28/2024, 10:16 AM - Bob: hi";
//! let result = shrink(transcript, &TimeWindow::unbounded(), &ShrinkConfig::new())?;
//!
//! assert_eq!(result.message_count, 2);
//! assert_eq!(result.pseudonyms, vec!["A", "B"]);
//! # Ok::<(), chatshrink::ShrinkError>(())
//! ```

pub mod discord;
pub mod whatsapp;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::nickname::NicknameMap;
use crate::platform::{Platform, detect_platform};
use crate::window::TimeWindow;

/// Default safety cap on messages accepted into the window.
///
/// Guards the downstream LLM call against runaway prompt size; override with
/// [`ShrinkConfig::with_max_messages`] when a caller knowingly wants more.
pub const DEFAULT_MAX_MESSAGES: usize = 1000;

/// Marker WhatsApp appends to edited messages; stripped from every body.
pub(crate) const EDITED_MARKER: &str = "<This message was edited>";

/// Configuration for a compaction run.
///
/// # Example
///
/// ```rust
/// use chatshrink::shrink::ShrinkConfig;
///
/// let config = ShrinkConfig::new()
///     .with_max_messages(5000)
///     .with_skip_invalid(false);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShrinkConfig {
    /// Abort with `WindowTooWide` once more than this many messages are
    /// accepted (default: [`DEFAULT_MAX_MESSAGES`]).
    pub max_messages: usize,

    /// Skip lines that look like headers but fail field parsing instead of
    /// returning an error (default: true).
    pub skip_invalid: bool,
}

impl Default for ShrinkConfig {
    fn default() -> Self {
        Self {
            max_messages: DEFAULT_MAX_MESSAGES,
            skip_invalid: true,
        }
    }
}

impl ShrinkConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the accepted-message cap.
    #[must_use]
    pub fn with_max_messages(mut self, cap: usize) -> Self {
        self.max_messages = cap;
        self
    }

    /// Sets whether malformed headers are skipped or fatal.
    #[must_use]
    pub fn with_skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }
}

/// The outcome of one compaction run.
///
/// Produced once and returned by value; nothing in it aliases engine state.
/// `raw_names` and `pseudonyms` are parallel lists in first-seen order, ready
/// for prompt construction or per-user statistics downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShrinkResult {
    /// The compacted transcript, lines joined with `\n`.
    pub text: String,

    /// Headers accepted into the window (orphan lines are not counted).
    pub message_count: usize,

    /// Distinct speakers seen.
    pub user_count: usize,

    /// Raw display names in first-seen order.
    pub raw_names: Vec<String>,

    /// Assigned pseudonyms, parallel to `raw_names`.
    pub pseudonyms: Vec<String>,

    /// Lines that superficially matched a header grammar but failed field
    /// parsing and were skipped.
    pub skipped: usize,
}

/// Shrinks a transcript, auto-detecting the platform.
///
/// # Errors
///
/// - [`ShrinkError::UnsupportedPlatform`](crate::ShrinkError::UnsupportedPlatform)
///   if neither header grammar matches
/// - [`ShrinkError::WindowTooWide`](crate::ShrinkError::WindowTooWide) if the
///   window selects more than `config.max_messages` messages
/// - [`ShrinkError::MalformedHeader`](crate::ShrinkError::MalformedHeader)
///   for unparseable header fields, only when `config.skip_invalid` is false
pub fn shrink(transcript: &str, window: &TimeWindow, config: &ShrinkConfig) -> Result<ShrinkResult> {
    let platform = detect_platform(transcript)?;
    shrink_with_platform(platform, transcript, window, config)
}

/// Shrinks a transcript whose platform is already known, skipping detection.
pub fn shrink_with_platform(
    platform: Platform,
    transcript: &str,
    window: &TimeWindow,
    config: &ShrinkConfig,
) -> Result<ShrinkResult> {
    shrink_with_names(platform, transcript, window, config, NicknameMap::new())
}

/// Shrinks a transcript with a pre-seeded nickname map.
///
/// Seeded entries keep their pseudonyms; speakers not in the map are
/// allocated pseudonyms as they appear.
pub fn shrink_with_names(
    platform: Platform,
    transcript: &str,
    window: &TimeWindow,
    config: &ShrinkConfig,
    names: NicknameMap,
) -> Result<ShrinkResult> {
    match platform {
        Platform::WhatsApp => whatsapp::shrink(transcript, window, config, names),
        Platform::Discord => discord::shrink(transcript, window, config, names),
    }
}

/// Decides when the `date time - ` prefix is reprinted.
///
/// Consecutive messages within one hour of the last *printed* timestamp reuse
/// a blank prefix; a wider gap (or the very first message) reprints the
/// date and time. The comparison basis is always the last printed timestamp,
/// not the immediately preceding message's.
pub(crate) struct TimestampCollapser {
    last_printed: Option<DateTime<Utc>>,
}

impl TimestampCollapser {
    pub(crate) fn new() -> Self {
        Self { last_printed: None }
    }

    /// Returns the output-line prefix for a message at `ts` whose header
    /// carried the given raw date/time strings.
    pub(crate) fn prefix(
        &mut self,
        ts: Option<DateTime<Utc>>,
        date_str: &str,
        time_str: &str,
    ) -> String {
        let reprint = match (ts, self.last_printed) {
            (Some(ts), Some(last)) => ts - last > Duration::hours(1),
            // First message, or a message whose timestamp could not be
            // anchored (Discord header before any date was seen).
            _ => true,
        };

        if !reprint {
            return String::new();
        }
        if let Some(ts) = ts {
            self.last_printed = Some(ts);
        }

        let stamp = format!("{date_str} {time_str}");
        let stamp = stamp.trim();
        if stamp.is_empty() {
            String::new()
        } else {
            format!("{stamp} - ")
        }
    }
}

/// Formats an orphan continuation line: one leading space, edited marker
/// stripped, no speaker attribution.
pub(crate) fn orphan_line(line: &str) -> String {
    format!(" {}", line.replace(EDITED_MARKER, ""))
}

/// Assembles the final result from the emitted lines and the nickname map.
pub(crate) fn build_result(
    lines: Vec<String>,
    message_count: usize,
    skipped: usize,
    names: &NicknameMap,
) -> ShrinkResult {
    ShrinkResult {
        text: lines.join("\n"),
        message_count,
        user_count: names.len(),
        raw_names: names.raw_names(),
        pseudonyms: names.nicknames(),
        skipped,
    }
}
