//! Discord transcript shrinker.
//!
//! Discord text exports spread each message over at least two lines: an
//! em-dash header with no body, then the body on the following line(s):
//!
//! ```text
//! Alice — 12/28/24, 10:15 AM
//! hello there
//! and a second fragment
//! Bob — 10:16 AM
//! hi
//! ```
//!
//! Headers may omit the date; the last seen header date is carried forward
//! to anchor such messages in time. Pinned-message system lines are never
//! treated as headers.

use chrono::{DateTime, Utc};

use crate::error::{Result, ShrinkError};
use crate::nickname::NicknameMap;
use crate::platform::{discord_header_regex, is_discord_header};
use crate::shrink::{
    EDITED_MARKER, ShrinkConfig, ShrinkResult, TimestampCollapser, build_result, orphan_line,
};
use crate::window::{TimeWindow, parse_message_datetime, window_start_index};

/// Extracts a timestamp from a dated header line.
///
/// Dateless headers yield `None` here: without the forward-carried date
/// context the backward window scan cannot anchor them.
fn extract_datetime(line: &str) -> Option<DateTime<Utc>> {
    let line = line.trim();
    if line.contains("pin") {
        return None;
    }
    let caps = discord_header_regex().captures(line)?;
    let date = caps.get(2)?;
    parse_message_datetime(date.as_str(), caps.get(3).map(|m| m.as_str()))
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

    let regex = discord_header_regex();
    let mut out: Vec<String> = Vec::new();
    let mut collapser = TimestampCollapser::new();
    // Date carried forward from the last dated header.
    let mut carried_date: Option<String> = None;
    let mut message_open = false;
    let mut awaiting_first_fragment = false;
    let mut message_count = 0usize;
    let mut skipped = 0usize;

    for (offset, raw_line) in lines[start_index..].iter().enumerate() {
        let line = raw_line.trim();

        if is_discord_header(line) {
            let Some(caps) = regex.captures(line) else {
                continue;
            };
            let speaker = caps.get(1).map_or("", |m| m.as_str().trim());
            let header_date = caps.get(2).map(|m| m.as_str());
            let time_str = caps.get(3).map_or("", |m| m.as_str());

            let date_for_ts = header_date.or(carried_date.as_deref());
            let ts = date_for_ts.and_then(|d| parse_message_datetime(d, Some(time_str)));

            if ts.is_none() && date_for_ts.is_some() {
                // A date was available but the fields don't parse.
                let line_number = start_index + offset + 1;
                if !config.skip_invalid {
                    return Err(ShrinkError::malformed_header(
                        line_number,
                        format!("unparseable date/time '{} {time_str}'", date_for_ts.unwrap_or("")),
                    ));
                }
                if message_count == 0 {
                    out.push(orphan_line(line));
                } else {
                    skipped += 1;
                }
                continue;
            }

            if let Some(ts) = ts {
                if window.exceeds(ts) {
                    break;
                }
            }

            message_count += 1;
            if message_count > config.max_messages {
                return Err(ShrinkError::WindowTooWide {
                    cap: config.max_messages,
                });
            }

            if let Some(date) = header_date {
                carried_date = Some(date.to_string());
            }

            let pseudonym = names.resolve(speaker);
            let prefix = collapser.prefix(ts, header_date.unwrap_or(""), time_str);
            out.push(format!("{prefix}{pseudonym}: "));
            message_open = true;
            awaiting_first_fragment = true;
            continue;
        }

        if message_open {
            // Body fragments attach to the open header line: the first with
            // no separator, later ones with a single space.
            if let Some(open_line) = out.last_mut() {
                let fragment = line.replace(EDITED_MARKER, "");
                if awaiting_first_fragment {
                    awaiting_first_fragment = false;
                } else {
                    open_line.push(' ');
                }
                open_line.push_str(&fragment);
            }
        } else {
            out.push(orphan_line(line));
        }
    }

    Ok(build_result(out, message_count, skipped, &names))
}
