//! # Chatshrink
//!
//! A Rust library for compacting chat transcripts from popular messaging
//! platforms into short, anonymized text ready for LLM prompts.
//!
//! ## Overview
//!
//! Chatshrink takes a raw text export from:
//! - **WhatsApp** — `date, time - Name: body` single-line headers
//! - **Discord** — `Name — date, time` headers with the body on following lines
//!
//! and produces a compacted rendition: speaker names replaced by short unique
//! pseudonyms, timestamps printed only when more than an hour has passed since
//! the last printed one, and message selection restricted to an optional
//! inclusive date/time window. A safety cap aborts when the window selects
//! more messages than a prompt should carry.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatshrink::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let transcript = "12/28/2024, 10:15 AM - Alice: hello\n\
//!                       12/28/2024, 10:16 AM - Bob: hi";
//!
//!     let result = shrink(transcript, &TimeWindow::unbounded(), &ShrinkConfig::new())?;
//!
//!     assert_eq!(result.text, "12/28/2024 10:15 AM - A: hello\nB: hi");
//!     assert_eq!(result.user_count, 2);
//!     Ok(())
//! }
//! ```
//!
//! ## Windowed Selection
//!
//! ```rust
//! use chatshrink::prelude::*;
//!
//! let window = TimeWindow::from_parts(
//!     Some("12/28/2024"), Some("9:00 AM"),
//!     Some("12/28/2024"), Some("5:00 PM"),
//! )?;
//! let config = ShrinkConfig::new().with_max_messages(500);
//! # Ok::<(), chatshrink::ShrinkError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`shrink`] — the compaction engine
//!   - [`shrink::shrink`], [`shrink::shrink_with_platform`], [`shrink::shrink_with_names`]
//!   - [`ShrinkConfig`](shrink::ShrinkConfig), [`ShrinkResult`](shrink::ShrinkResult)
//! - [`platform`] — header grammars and platform detection
//!   - [`Platform`](platform::Platform), [`detect_platform`](platform::detect_platform)
//! - [`window`] — inclusive date/time windows ([`TimeWindow`](window::TimeWindow))
//! - [`nickname`] — pseudonym allocation ([`NicknameMap`](nickname::NicknameMap))
//! - [`cli`] — CLI argument types (behind the `cli` feature)
//! - [`error`] — unified error types ([`ShrinkError`], [`Result`])
//! - [`prelude`] — convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
pub mod nickname;
pub mod platform;
pub mod shrink;
pub mod window;

// Re-export the main types at the crate root for convenience
pub use error::{Result, ShrinkError};
pub use platform::Platform;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatshrink::prelude::*;
/// ```
pub mod prelude {
    // Error types
    pub use crate::error::{Result, ShrinkError};

    // Engine entry points and types
    pub use crate::shrink::{
        ShrinkConfig, ShrinkResult, shrink, shrink_with_names, shrink_with_platform,
    };

    // Platform detection
    pub use crate::platform::{Platform, detect_platform};

    // Window selection
    pub use crate::window::TimeWindow;

    // Pseudonym allocation
    pub use crate::nickname::NicknameMap;
}
