//! Unified error types for chatshrink.
//!
//! This module provides a single [`ShrinkError`] enum that covers all error
//! cases in the library.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - Fatal errors never leave partial output behind: the compacted text is
//!   only returned (or written) when the whole call succeeded

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for chatshrink operations.
///
/// # Example
///
/// ```rust
/// use chatshrink::error::Result;
/// use chatshrink::shrink::ShrinkResult;
///
/// fn my_function() -> Result<Option<ShrinkResult>> {
///     // ... operations that may fail
///     Ok(None)
/// }
/// ```
pub type Result<T> = std::result::Result<T, ShrinkError>;

/// The error type for all chatshrink operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ShrinkError {
    /// An I/O error occurred.
    ///
    /// Only produced by the file-handling wrappers (CLI); the engine itself
    /// never touches the filesystem.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The transcript matched neither the WhatsApp nor the Discord header
    /// grammar.
    ///
    /// Fatal for the call; no partial output is returned.
    #[error(
        "unrecognized chat export: no WhatsApp or Discord message header found in the transcript"
    )]
    UnsupportedPlatform,

    /// The time window selected more messages than the safety cap allows.
    ///
    /// Fatal for the call; no partial output is returned. The cap guards
    /// against unbounded downstream processing cost and can be raised via
    /// [`ShrinkConfig::with_max_messages`](crate::shrink::ShrinkConfig::with_max_messages).
    #[error("window selects more than {cap} messages; narrow the date/time bounds")]
    WindowTooWide {
        /// The configured message cap
        cap: usize,
    },

    /// A line superficially matched a header grammar but one of its fields
    /// failed to parse.
    ///
    /// Recoverable by default (the line is skipped and counted); surfaced as
    /// an error only when `skip_invalid` is disabled in the configuration.
    #[error("malformed header at line {line}: {reason}")]
    MalformedHeader {
        /// 1-based line number within the transcript
        line: usize,
        /// What failed to parse
        reason: String,
    },

    /// An invalid date or time string was supplied for the time window.
    #[error("invalid {what} '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// Which bound field was malformed ("date" or "time")
        what: &'static str,
        /// The invalid string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },
}

impl ShrinkError {
    /// Creates a malformed header error for a 1-based transcript line.
    pub fn malformed_header(line: usize, reason: impl Into<String>) -> Self {
        ShrinkError::MalformedHeader {
            line,
            reason: reason.into(),
        }
    }

    /// Creates an invalid window date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ShrinkError::InvalidDate {
            what: "date",
            input: input.into(),
            expected: "MM/DD/YYYY",
        }
    }

    /// Creates an invalid window time error.
    pub fn invalid_time(input: impl Into<String>) -> Self {
        ShrinkError::InvalidDate {
            what: "time",
            input: input.into(),
            expected: "H:MM AM/PM",
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ShrinkError::Io(_))
    }

    /// Returns `true` if the platform could not be recognized.
    pub fn is_unsupported_platform(&self) -> bool {
        matches!(self, ShrinkError::UnsupportedPlatform)
    }

    /// Returns `true` if the safety cap was exceeded.
    pub fn is_window_too_wide(&self) -> bool {
        matches!(self, ShrinkError::WindowTooWide { .. })
    }

    /// Returns `true` if this is a malformed header error.
    pub fn is_malformed_header(&self) -> bool {
        matches!(self, ShrinkError::MalformedHeader { .. })
    }
}
