//! Console output framing and log-line parsing
//!
//! The Bedrock dedicated server writes console output in chunks that do
//! not necessarily align with line boundaries. [`LineAssembler`]
//! reassembles chunks into complete `\r\n`-terminated text, and
//! [`parse_console`] turns that text into structured [`ConsoleEvent`]s.

use serde::{Deserialize, Serialize};

/// Line terminator used by the server console
pub const LINE_TERMINATOR: &str = "\r\n";

/// No-op marker the server prints between commands
const NOOP_MARKER: &str = ":r";

/// A structured console line
///
/// Timestamped lines look like `[2024-01-01 12:00:00 INFO] [Server] msg`;
/// for lines with no bracketed header all header fields are absent and
/// `line` carries the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleEvent {
    /// Message body with the bracketed header removed
    pub line: String,
    /// Date from the first bracketed segment, e.g. `2024-01-01`
    pub date: Option<String>,
    /// Time from the first bracketed segment, e.g. `12:00:00`
    pub time: Option<String>,
    /// Lower-cased tags: the level from the first segment, then one
    /// entry per additional bracketed segment, in order of appearance
    pub meta: Vec<String>,
}

/// Reassembles output chunks into complete lines.
///
/// Holds at most one pending fragment; the fragment is cleared whenever
/// a chunk completes it, so state never leaks across flushes.
#[derive(Debug, Default)]
pub struct LineAssembler {
    pending: String,
}

impl LineAssembler {
    /// Create an empty assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one decoded chunk.
    ///
    /// Returns the full reassembled text when the chunk ends with the
    /// line terminator, `None` while a line is still incomplete.
    pub fn push(&mut self, chunk: &str) -> Option<String> {
        if chunk.ends_with(LINE_TERMINATOR) {
            if self.pending.is_empty() {
                Some(chunk.to_string())
            } else {
                let mut text = std::mem::take(&mut self.pending);
                text.push_str(chunk);
                Some(text)
            }
        } else {
            self.pending.push_str(chunk);
            None
        }
    }

    /// Whether a partial line is currently buffered
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Parse reassembled console text into events, one per non-empty,
/// non-marker line.
pub fn parse_console(text: &str) -> Vec<ConsoleEvent> {
    text.split(LINE_TERMINATOR)
        .filter(|line| !line.is_empty() && *line != NOOP_MARKER)
        .map(parse_line)
        .collect()
}

/// Parse a single console line.
///
/// Lines without bracketed segments pass through unchanged with all
/// header fields absent. Otherwise the first up to three segments form
/// the header, which is removed (with one trailing space) from the
/// message. Segment contents are lower-cased; the first decomposes by
/// spaces into date, time and level tag. A first segment with fewer
/// than three tokens keeps the fields it has and leaves the rest
/// absent; tokens beyond the third are ignored.
fn parse_line(line: &str) -> ConsoleEvent {
    let segments = bracketed_segments(line);
    if segments.is_empty() {
        return ConsoleEvent {
            line: line.to_string(),
            date: None,
            time: None,
            meta: Vec::new(),
        };
    }

    let header: Vec<&str> = segments.iter().take(3).map(|s| s.raw).collect();
    let header = format!("{} ", header.join(" "));
    let message = line.replacen(&header, "", 1);

    let meta_raw: Vec<String> = segments.iter().map(|s| s.inner.to_lowercase()).collect();

    let mut tokens = meta_raw[0].split(' ').filter(|t| !t.is_empty());
    let date = tokens.next().map(str::to_string);
    let time = tokens.next().map(str::to_string);
    let mut meta = Vec::new();
    if let Some(level) = tokens.next() {
        meta.push(level.to_string());
    }
    meta.extend(meta_raw.into_iter().skip(1));

    ConsoleEvent {
        line: message,
        date,
        time,
        meta,
    }
}

struct Segment<'a> {
    /// Segment including the bracket characters
    raw: &'a str,
    /// Segment content between the brackets
    inner: &'a str,
}

/// Extract bracketed segments in order of appearance. Each segment runs
/// from a `[` to the nearest following `]`; an unmatched `[` ends the
/// scan.
fn bracketed_segments(line: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'[' {
            match line[i + 1..].find(']') {
                Some(close) => {
                    let end = i + 1 + close;
                    segments.push(Segment {
                        raw: &line[i..=end],
                        inner: &line[i + 1..end],
                    });
                    i = end + 1;
                }
                None => break,
            }
        } else {
            i += 1;
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembler_buffers_incomplete_chunks() {
        let mut assembler = LineAssembler::new();
        assert_eq!(assembler.push("partial"), None);
        assert!(assembler.has_pending());
        assert_eq!(assembler.push(" still going"), None);
        assert_eq!(
            assembler.push(" done\r\n"),
            Some("partial still going done\r\n".to_string())
        );
        assert!(!assembler.has_pending());
    }

    #[test]
    fn test_assembler_passes_complete_chunks_through() {
        let mut assembler = LineAssembler::new();
        assert_eq!(
            assembler.push("one line\r\nanother\r\n"),
            Some("one line\r\nanother\r\n".to_string())
        );
        // Fragment state was never touched
        assert!(!assembler.has_pending());
    }

    #[test]
    fn test_split_chunks_match_single_chunk() {
        let full = "[2024-01-01 12:00:00 INFO] [Server] Starting...\r\n";
        let single = parse_console(full);

        let mut assembler = LineAssembler::new();
        assert_eq!(assembler.push("[2024-01-01 12:00:00 INFO] [Ser"), None);
        let text = assembler.push("ver] Starting...\r\n").unwrap();
        assert_eq!(parse_console(&text), single);
    }

    #[test]
    fn test_event_count_matches_line_count() {
        let text = "first\r\n\r\n:r\r\nsecond\r\n";
        let events = parse_console(text);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].line, "first");
        assert_eq!(events[1].line, "second");
    }

    #[test]
    fn test_plain_line_passes_through() {
        let events = parse_console("NO LOG FILE! - setting up server logging...\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].line, "NO LOG FILE! - setting up server logging...");
        assert_eq!(events[0].date, None);
        assert_eq!(events[0].time, None);
        assert!(events[0].meta.is_empty());
    }

    #[test]
    fn test_timestamped_line() {
        let events = parse_console("[2024-01-01 12:00:00 INFO] [Server] Starting...\r\n");
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.line, "Starting...");
        assert_eq!(event.date.as_deref(), Some("2024-01-01"));
        assert_eq!(event.time.as_deref(), Some("12:00:00"));
        assert_eq!(event.meta, vec!["info", "server"]);
    }

    #[test]
    fn test_extra_segments_append_to_meta() {
        let events =
            parse_console("[2024-01-01 12:00:00 INFO] [Server] [Network] Session opened\r\n");
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.line, "Session opened");
        assert_eq!(event.meta, vec!["info", "server", "network"]);
    }

    #[test]
    fn test_short_header_keeps_what_it_has() {
        // Only date and time present, no level tag
        let events = parse_console("[2024-01-01 12:00:00] Player connected\r\n");
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.line, "Player connected");
        assert_eq!(event.date.as_deref(), Some("2024-01-01"));
        assert_eq!(event.time.as_deref(), Some("12:00:00"));
        assert!(event.meta.is_empty());
    }

    #[test]
    fn test_unmatched_bracket_is_timestampless() {
        let events = parse_console("[broken line\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].line, "[broken line");
        assert_eq!(events[0].date, None);
    }

    #[test]
    fn test_event_serializes_with_optional_fields() {
        let event = ConsoleEvent {
            line: "Starting...".into(),
            date: Some("2024-01-01".into()),
            time: Some("12:00:00".into()),
            meta: vec!["info".into()],
        };
        let json = serde_json::to_string(&event).unwrap();
        let decoded: ConsoleEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, event);
    }
}
