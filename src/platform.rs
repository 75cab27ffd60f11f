//! Platform tags and transcript classification.
//!
//! Chat exports carry no explicit format marker, so the engine inspects the
//! raw lines and classifies the transcript by which header grammar appears:
//!
//! - **WhatsApp**: `M/D/YY[YY], H:MM[:SS] [AM/PM] - Name: Message`
//! - **Discord**: `Name — H:MM AM/PM` or `Name — M/D/YY, H:MM AM/PM`
//!   (em-dash separated header line with the message body on the next line)
//!
//! Detection order matters: the WhatsApp grammar is strictly more specific
//! (a date AND an inline `": message"` on one line), so it is checked first.
//! Discord headers never carry an inline message.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShrinkError};

/// WhatsApp header grammar, applied to whitespace-trimmed lines.
///
/// Captures: 1 = date, 2 = time (optional), 3 = speaker, 4 = body.
const WHATSAPP_HEADER_PATTERN: &str = r"^(\d{1,2}/\d{1,2}/\d{2,4}),?\s*(\d{1,2}:\d{2}(?::\d{2})?(?:\s?(?:AM|PM))?)?\s*-\s*(.*?):\s*(.*)$";

/// Discord header grammar: a line that is ONLY `speaker — [date,] time`.
///
/// Captures: 1 = speaker, 2 = date (optional), 3 = time.
const DISCORD_HEADER_PATTERN: &str =
    r"^(.+?)\s*—\s*(?:(\d{1,2}/\d{1,2}/\d{2,4}),?\s*)?(\d{1,2}:\d{2}(?:\s?(?:AM|PM))?)$";

static WHATSAPP_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(WHATSAPP_HEADER_PATTERN).unwrap());

static DISCORD_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DISCORD_HEADER_PATTERN).unwrap());

/// Returns the compiled WhatsApp header regex.
pub(crate) fn whatsapp_header_regex() -> &'static Regex {
    &WHATSAPP_HEADER
}

/// Returns the compiled Discord header regex.
pub(crate) fn discord_header_regex() -> &'static Regex {
    &DISCORD_HEADER
}

/// Checks a trimmed line against the Discord header grammar.
///
/// Pinned-message system lines mention "pin" and must never be treated as
/// headers; the `regex` crate has no lookaheads, so the exclusion is a
/// substring check in front of the grammar.
pub(crate) fn is_discord_header(line: &str) -> bool {
    !line.contains("pin") && DISCORD_HEADER.is_match(line)
}

/// Supported transcript export formats.
///
/// # Example
///
/// ```rust
/// use chatshrink::platform::Platform;
/// use std::str::FromStr;
///
/// let platform = Platform::from_str("whatsapp").unwrap();
/// assert_eq!(platform, Platform::WhatsApp);
///
/// // Aliases are supported
/// let platform = Platform::from_str("dc").unwrap();
/// assert_eq!(platform, Platform::Discord);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Platform {
    /// WhatsApp TXT exports (single-line headers with inline message text)
    #[serde(alias = "wa")]
    WhatsApp,

    /// Discord text exports (two-line messages with em-dash headers)
    #[serde(alias = "dc")]
    Discord,
}

impl Platform {
    /// Returns all platform names including aliases.
    pub fn all_names() -> &'static [&'static str] {
        &["whatsapp", "wa", "discord", "dc"]
    }

    /// Returns all available platforms.
    pub fn all() -> &'static [Platform] {
        &[Platform::WhatsApp, Platform::Discord]
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::WhatsApp => write!(f, "WhatsApp"),
            Platform::Discord => write!(f, "Discord"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "whatsapp" | "wa" => Ok(Platform::WhatsApp),
            "discord" | "dc" => Ok(Platform::Discord),
            _ => Err(format!(
                "Unknown platform: '{}'. Expected one of: {}",
                s,
                Platform::all_names().join(", ")
            )),
        }
    }
}

/// Classifies a raw transcript by scanning for a known header grammar.
///
/// Every line is considered; a single well-formed WhatsApp header anywhere in
/// the transcript classifies it as WhatsApp regardless of noise lines. If no
/// WhatsApp header exists, Discord headers are searched for next.
///
/// # Errors
///
/// Returns [`ShrinkError::UnsupportedPlatform`] when neither grammar matches
/// any line. Callers must treat this as a hard failure, not a silent no-op.
///
/// # Example
///
/// ```rust
/// use chatshrink::platform::{Platform, detect_platform};
///
/// let transcript = "12/28/2024, 10:15 AM - Alice: hello";
/// assert_eq!(detect_platform(transcript).unwrap(), Platform::WhatsApp);
/// ```
pub fn detect_platform(transcript: &str) -> Result<Platform> {
    if transcript
        .lines()
        .any(|line| WHATSAPP_HEADER.is_match(line.trim()))
    {
        return Ok(Platform::WhatsApp);
    }

    if transcript
        .lines()
        .any(|line| is_discord_header(line.trim()))
    {
        return Ok(Platform::Discord);
    }

    Err(ShrinkError::UnsupportedPlatform)
}
