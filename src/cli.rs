//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`default_output_path`] - the `_shrinked.txt` sibling-path convention
//!
//! The platform argument reuses [`Platform`](crate::platform::Platform) from
//! the library, so CLI and library callers spell platforms the same way.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::platform::Platform;

/// Compact a WhatsApp or Discord chat export into short, anonymized text
/// ready for LLM prompts.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatshrink")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatshrink whatsapp_chat.txt
    chatshrink chat.txt --platform discord
    chatshrink chat.txt --start-date 12/28/2024 --end-date 12/29/2024
    chatshrink chat.txt --start-date 12/28/2024 --start-time \"9:00 AM\"
    chatshrink chat.txt -o compact.txt --max-messages 500
    chatshrink chat.txt --json")]
pub struct Args {
    /// Path to the chat export file
    pub input: String,

    /// Platform of the export (whatsapp, wa, discord, dc); auto-detected
    /// when omitted
    #[arg(short, long, value_name = "PLATFORM")]
    pub platform: Option<Platform>,

    /// Keep messages from this date on (MM/DD/YYYY, inclusive)
    #[arg(long, value_name = "DATE")]
    pub start_date: Option<String>,

    /// Time of day the window opens (H:MM AM/PM); requires --start-date
    #[arg(long, value_name = "TIME")]
    pub start_time: Option<String>,

    /// Keep messages up to this date (MM/DD/YYYY, inclusive)
    #[arg(long, value_name = "DATE")]
    pub end_date: Option<String>,

    /// Time of day the window closes (H:MM AM/PM); requires --end-date
    #[arg(long, value_name = "TIME")]
    pub end_time: Option<String>,

    /// Path to the output file (default: input path with a _shrinked suffix)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Abort when the window selects more than this many messages
    #[arg(long, value_name = "N", default_value_t = crate::shrink::DEFAULT_MAX_MESSAGES)]
    pub max_messages: usize,

    /// Fail on malformed headers instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Print the run summary as JSON instead of the human-readable report
    #[arg(long)]
    pub json: bool,
}

/// Derives the default output path from the input path.
///
/// `chat.txt` becomes `chat_shrinked.txt` in the same directory; an input
/// without an extension gets `_shrinked.txt` appended to its stem.
pub fn default_output_path(input: &str) -> PathBuf {
    let path = Path::new(input);
    let stem = path
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
    let file_name = format!("{stem}_shrinked.txt");
    path.with_file_name(file_name)
}
