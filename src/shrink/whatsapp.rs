//! WhatsApp transcript shrinker.
//!
//! WhatsApp exports put the whole message header on one line:
//!
//! ```text
//! 12/28/2024, 10:15 AM - Alice: hello there
//! this wraps onto a second physical line
//! ```
//!
//! Lines that do not match the header grammar are continuations of the
//! preceding message (or orphans when no message is open yet) and are
//! emitted with a single leading space.

use chrono::{DateTime, Utc};

use crate::error::{Result, ShrinkError};
use crate::nickname::NicknameMap;
use crate::platform::whatsapp_header_regex;
use crate::shrink::{
    EDITED_MARKER, ShrinkConfig, ShrinkResult, TimestampCollapser, build_result, orphan_line,
};
use crate::window::{TimeWindow, parse_message_datetime, window_start_index};

/// Extracts a timestamp from a line if it matches the header grammar.
///
/// Used by the window-start scan; lines that are not headers (or whose date
/// fails to parse) yield `None` and are passed over.
fn extract_datetime(line: &str) -> Option<DateTime<Utc>> {
    let caps = whatsapp_header_regex().captures(line.trim())?;
    parse_message_datetime(caps.get(1)?.as_str(), caps.get(2).map(|m| m.as_str()))
}

pub(crate) fn shrink(
    transcript: &str,
    window: &TimeWindow,
    config: &ShrinkConfig,
    mut names: NicknameMap,
) -> Result<ShrinkResult> {
    let lines: Vec<&str> = transcript.lines().collect();

    let start_index = match window.start {
        Some(start) => window_start_index(&lines, extract_datetime, start),
        None => 0,
    };

    let regex = whatsapp_header_regex();
    let mut out: Vec<String> = Vec::new();
    let mut collapser = TimestampCollapser::new();
    let mut message_count = 0usize;
    let mut skipped = 0usize;

    for (offset, raw_line) in lines[start_index..].iter().enumerate() {
        let line = raw_line.trim();

        let Some(caps) = regex.captures(line) else {
            // Orphan continuation: no timestamp, never window-tested, never
            // attributed to a speaker.
            out.push(orphan_line(line));
            continue;
        };

        let date_str = caps.get(1).map_or("", |m| m.as_str());
        let time_str = caps.get(2).map(|m| m.as_str());
        let speaker = caps.get(3).map_or("", |m| m.as_str().trim());
        let body = caps.get(4).map_or("", |m| m.as_str());

        let Some(ts) = parse_message_datetime(date_str, time_str) else {
            // Superficially a header, but the date/time fields don't parse.
            let line_number = start_index + offset + 1;
            if !config.skip_invalid {
                return Err(ShrinkError::malformed_header(
                    line_number,
                    format!("unparseable date/time '{date_str}'"),
                ));
            }
            if message_count == 0 {
                // No speaker context yet: demote to orphan continuation.
                out.push(orphan_line(line));
            } else {
                skipped += 1;
            }
            continue;
        };

        if window.exceeds(ts) {
            // End of window: stop processing entirely, discarding this line.
            break;
        }

        message_count += 1;
        if message_count > config.max_messages {
            return Err(ShrinkError::WindowTooWide {
                cap: config.max_messages,
            });
        }

        let pseudonym = names.resolve(speaker);
        let body = body.replace(EDITED_MARKER, "");
        let prefix = collapser.prefix(Some(ts), date_str, time_str.unwrap_or(""));
        out.push(format!("{prefix}{pseudonym}: {body}"));
    }

    Ok(build_result(out, message_count, skipped, &names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn run(transcript: &str) -> ShrinkResult {
        shrink(
            transcript,
            &TimeWindow::unbounded(),
            &ShrinkConfig::new(),
            NicknameMap::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_message_round_trip() {
        let result = run("12/28/2024, 10:15 AM - Alice: hello <This message was edited>");
        assert_eq!(result.text, "12/28/2024 10:15 AM - A: hello ");
        assert_eq!(result.message_count, 1);
        assert_eq!(result.user_count, 1);
        assert_eq!(result.raw_names, vec!["Alice"]);
        assert_eq!(result.pseudonyms, vec!["A"]);
    }

    #[test]
    fn test_timestamp_collapsing_within_hour() {
        let transcript = "\
12/28/2024, 10:15 AM - Alice: hello
12/28/2024, 10:16 AM - Bob: hi
12/28/2024, 11:45 AM - Alice: still there?";
        let result = run(transcript);
        let lines: Vec<&str> = result.text.lines().collect();
        assert_eq!(lines[0], "12/28/2024 10:15 AM - A: hello");
        assert_eq!(lines[1], "B: hi");
        assert_eq!(lines[2], "12/28/2024 11:45 AM - A: still there?");
    }

    #[test]
    fn test_continuation_lines_become_orphans() {
        let transcript = "\
12/28/2024, 10:15 AM - Alice: first line
second line
third line";
        let result = run(transcript);
        let lines: Vec<&str> = result.text.lines().collect();
        assert_eq!(lines[1], " second line");
        assert_eq!(lines[2], " third line");
        assert_eq!(result.message_count, 1);
    }

    #[test]
    fn test_orphan_before_any_header() {
        let transcript = "\
stray preamble
12/28/2024, 10:15 AM - Alice: hello";
        let result = run(transcript);
        let lines: Vec<&str> = result.text.lines().collect();
        assert_eq!(lines[0], " stray preamble");
        assert_eq!(result.message_count, 1);
        assert_eq!(result.user_count, 1);
    }

    #[test]
    fn test_window_start_drops_earlier_lines() {
        let transcript = "\
12/27/2024, 9:00 AM - Alice: yesterday
12/28/2024, 10:15 AM - Bob: today";
        let window =
            TimeWindow::from_parts(Some("12/28/2024"), Some("12:00 AM"), None, None).unwrap();
        let result = shrink(transcript, &window, &ShrinkConfig::new(), NicknameMap::new()).unwrap();
        assert_eq!(result.message_count, 1);
        assert_eq!(result.raw_names, vec!["Bob"]);
        assert!(result.text.contains("B: today"));
        assert!(!result.text.contains("yesterday"));
    }

    #[test]
    fn test_window_end_is_inclusive_and_halts() {
        let transcript = "\
12/29/2024, 11:59 PM - Alice: in window
12/30/2024, 12:00 AM - Bob: out of window
12/29/2024, 11:00 PM - Alice: never reached";
        let window = TimeWindow::from_parts(
            Some("12/28/2024"),
            Some("12:00 AM"),
            Some("12/29/2024"),
            Some("11:59 PM"),
        )
        .unwrap();
        let result = shrink(transcript, &window, &ShrinkConfig::new(), NicknameMap::new()).unwrap();
        // The 11:59 PM message is included; the 12:00 AM message is excluded
        // and stops processing, so the later in-window line is never seen.
        assert_eq!(result.message_count, 1);
        assert!(result.text.contains("in window"));
        assert!(!result.text.contains("never reached"));
    }

    #[test]
    fn test_cap_exactly_at_limit_succeeds() {
        let transcript = transcript_of(3);
        let config = ShrinkConfig::new().with_max_messages(3);
        let result = shrink(
            &transcript,
            &TimeWindow::unbounded(),
            &config,
            NicknameMap::new(),
        )
        .unwrap();
        assert_eq!(result.message_count, 3);
    }

    #[test]
    fn test_cap_exceeded_aborts() {
        let transcript = transcript_of(4);
        let config = ShrinkConfig::new().with_max_messages(3);
        let err = shrink(
            &transcript,
            &TimeWindow::unbounded(),
            &config,
            NicknameMap::new(),
        )
        .unwrap_err();
        assert!(err.is_window_too_wide());
    }

    #[test]
    fn test_malformed_header_skipped_and_counted() {
        let transcript = "\
12/28/2024, 10:15 AM - Alice: ok
13/45/2024, 10:16 AM - Bob: bad date";
        let result = run(transcript);
        assert_eq!(result.message_count, 1);
        assert_eq!(result.skipped, 1);
        assert!(!result.text.contains("bad date"));
    }

    #[test]
    fn test_malformed_first_header_becomes_orphan() {
        let transcript = "\
13/45/2024, 10:16 AM - Bob: bad date
12/28/2024, 10:15 AM - Alice: ok";
        let result = run(transcript);
        assert_eq!(result.message_count, 1);
        assert_eq!(result.skipped, 0);
        assert!(result.text.starts_with(" 13/45/2024"));
        // The malformed line was never attributed to a speaker.
        assert_eq!(result.raw_names, vec!["Alice"]);
    }

    #[test]
    fn test_malformed_header_fatal_when_strict() {
        let transcript = "\
12/28/2024, 10:15 AM - Alice: ok
13/45/2024, 10:16 AM - Bob: bad date";
        let config = ShrinkConfig::new().with_skip_invalid(false);
        let err = shrink(
            transcript,
            &TimeWindow::unbounded(),
            &config,
            NicknameMap::new(),
        )
        .unwrap_err();
        assert!(err.is_malformed_header());
    }

    #[test]
    fn test_preseeded_names() {
        let mut names = NicknameMap::new();
        names.insert("Joey", "J");
        names.insert("Norma Saganeiti", "N");
        let transcript = "\
12/28/2024, 10:15 AM - Joey: hey
12/28/2024, 10:16 AM - Norma Saganeiti: hi";
        let result = shrink(
            transcript,
            &TimeWindow::unbounded(),
            &ShrinkConfig::new(),
            names,
        )
        .unwrap();
        assert!(result.text.contains("J: hey"));
        assert!(result.text.contains("N: hi"));
    }

    #[test]
    fn test_header_without_time() {
        let result = run("12/28/2024 - Alice: dated only");
        assert_eq!(result.text, "12/28/2024 - A: dated only");
        assert_eq!(result.message_count, 1);
    }

    #[test]
    fn test_24_hour_time() {
        let result = run("12/28/2024, 21:15 - Alice: evening");
        assert_eq!(result.text, "12/28/2024 21:15 - A: evening");
    }

    #[test]
    fn test_recompaction_of_header_lines_is_stable() {
        // Running the shrinker over its own output reproduces the same
        // timestamp prints once names are already pseudonyms.
        let first = run("\
12/28/2024, 10:15 AM - Alice: hello
12/28/2024, 10:16 AM - Alice: again");
        let again = run(&first.text);
        assert_eq!(again.text.lines().next(), first.text.lines().next());
        assert_eq!(again.message_count, 1); // collapsed line has no header
    }

    #[test]
    fn test_extract_datetime() {
        let ts = extract_datetime("12/28/2024, 10:15 AM - Alice: hello").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 12, 28, 10, 15, 0).unwrap());
        assert!(extract_datetime("no header here").is_none());
        assert!(extract_datetime("13/45/2024, 10:15 AM - Alice: bad").is_none());
    }

    fn transcript_of(n: usize) -> String {
        (0..n)
            .map(|i| {
                format!(
                    "12/28/2024, 10:{:02} AM - {}: message {}",
                    i % 60,
                    if i % 2 == 0 { "Alice" } else { "Bob" },
                    i
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
