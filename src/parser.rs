//! Chat export parsing
//!
//! Turns the text of a WhatsApp-style export into a [`MessageCollection`].
//! Two header layouts are recognised:
//!
//! ```text
//! 12/1/23, 10:30 AM - Alice: Hello world        (Android)
//! [12/1/23, 10:30:15 AM] Alice: Hello world     (iOS)
//! ```
//!
//! A header without a `sender: ` prefix is a group notification. Any other
//! line continues the previous message. Parsing never fails on bad input;
//! headers whose timestamp matches none of the configured formats are
//! reported in [`ParseReport`] and skipped.

use chrono::NaiveDateTime;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{ParserConfig, DEFAULT_TIMESTAMP_FORMATS};
use crate::error::{ChatAnalysisError, Result};
use crate::models::{MessageCollection, MessageRecord, Sender};
use crate::validation::InputValidator;

const HEADER_PATTERN: &str = r"^(?:\[(?P<ios_date>\d{1,2}/\d{1,2}/\d{2,4}),\s*(?P<ios_clock>\d{1,2}:\d{2}(?::\d{2})?)(?:\s?(?P<ios_meridiem>[AaPp][Mm]))?\]\s*(?P<ios_rest>.*)|(?P<date>\d{1,2}/\d{1,2}/\d{2,4}),\s*(?P<clock>\d{1,2}:\d{2}(?::\d{2})?)(?:\s?(?P<meridiem>[AaPp][Mm]))?\s+-\s?(?P<rest>.*))$";

/// Direction marks some exporters put in front of lines
const DIRECTION_MARKS: [char; 2] = ['\u{200e}', '\u{200f}'];

/// A header line that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseIssue {
    /// 1-based line number in the export
    pub line: usize,
    /// What went wrong
    pub reason: String,
}

/// What happened during one parse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    /// Non-blank lines examined
    pub lines_read: usize,
    /// Records produced
    pub records: usize,
    /// Lines appended to a previous message
    pub continuation_lines: usize,
    /// Lines before the first header, discarded
    pub orphan_lines: usize,
    /// Continuation lines belonging to a dropped header
    pub dropped_continuation_lines: usize,
    /// Headers dropped because their timestamp did not parse
    pub issues: Vec<ParseIssue>,
}

impl ParseReport {
    /// Every line that did not end up in a record
    #[must_use]
    pub fn dropped_lines(&self) -> usize {
        self.orphan_lines + self.dropped_continuation_lines + self.issues.len()
    }
}

/// The message currently being assembled
enum Pending {
    None,
    Record(MessageRecord),
    /// Header was dropped; swallow its continuation lines
    Dropped,
}

/// Parser for chat export text
#[derive(Debug, Clone)]
pub struct ChatParser {
    header: Regex,
    timestamp_formats: Vec<String>,
}

impl ChatParser {
    /// Create a parser trying `timestamp_formats` in order
    pub fn new(timestamp_formats: &[String]) -> Result<Self> {
        if timestamp_formats.is_empty() {
            return Err(ChatAnalysisError::InvalidConfig(
                "at least one timestamp format is required".to_string(),
            ));
        }
        for format in timestamp_formats {
            InputValidator::validate_timestamp_format(format)
                .map_err(|e| ChatAnalysisError::InvalidTimestampFormat(e.to_string()))?;
        }

        Ok(Self {
            header: Regex::new(HEADER_PATTERN)?,
            timestamp_formats: timestamp_formats.to_vec(),
        })
    }

    /// Parser using the built-in timestamp formats
    pub fn with_defaults() -> Result<Self> {
        let formats: Vec<String> = DEFAULT_TIMESTAMP_FORMATS
            .iter()
            .map(ToString::to_string)
            .collect();
        Self::new(&formats)
    }

    /// Parser configured from the `parser` config section
    pub fn from_config(config: &ParserConfig) -> Result<Self> {
        Self::new(&config.timestamp_formats)
    }

    /// Parse an export, discarding the report
    #[must_use]
    pub fn parse(&self, text: &str) -> MessageCollection {
        self.parse_with_report(text).0
    }

    /// Parse an export and describe what was kept and dropped
    #[must_use]
    pub fn parse_with_report(&self, text: &str) -> (MessageCollection, ParseReport) {
        let mut report = ParseReport::default();
        let mut records = Vec::new();
        let mut pending = Pending::None;

        for (idx, raw_line) in text.lines().enumerate() {
            let line = raw_line
                .trim_end_matches('\r')
                .trim_start_matches(&DIRECTION_MARKS[..]);
            if line.trim().is_empty() {
                continue;
            }
            report.lines_read += 1;

            if let Some(caps) = self.header.captures(line) {
                if let Pending::Record(record) = std::mem::replace(&mut pending, Pending::None) {
                    records.push(finish(record));
                }

                pending = match self.record_from_header(&caps) {
                    Ok(record) => Pending::Record(record),
                    Err(reason) => {
                        debug!(line = idx + 1, %reason, "Dropping message header");
                        report.issues.push(ParseIssue {
                            line: idx + 1,
                            reason,
                        });
                        Pending::Dropped
                    }
                };
                continue;
            }

            match &mut pending {
                Pending::Record(record) => {
                    record.message.push('\n');
                    record.message.push_str(line);
                    report.continuation_lines += 1;
                }
                Pending::Dropped => report.dropped_continuation_lines += 1,
                Pending::None => report.orphan_lines += 1,
            }
        }

        if let Pending::Record(record) = pending {
            records.push(finish(record));
        }

        report.records = records.len();
        if records.is_empty() {
            warn!(lines = report.lines_read, "No messages found in export");
        } else {
            info!(
                records = report.records,
                continuation_lines = report.continuation_lines,
                dropped = report.dropped_lines(),
                "Parsed chat export"
            );
        }

        (MessageCollection::new(records), report)
    }

    /// Parse a date and clock as printed in an export header
    ///
    /// `time` may carry an AM/PM suffix in any case, with or without a
    /// separating space.
    #[must_use]
    pub fn parse_timestamp(&self, date: &str, time: &str) -> Option<NaiveDateTime> {
        let (clock, meridiem) = split_meridiem(time.trim());
        let candidate = match meridiem {
            Some(meridiem) => format!("{} {} {}", date.trim(), clock, meridiem.to_uppercase()),
            None => format!("{} {}", date.trim(), clock),
        };

        self.timestamp_formats
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&candidate, format).ok())
    }

    fn record_from_header(&self, caps: &Captures<'_>) -> std::result::Result<MessageRecord, String> {
        let group = |android: &str, ios: &str| {
            caps.name(android)
                .or_else(|| caps.name(ios))
                .map(|m| m.as_str())
        };

        let date = group("date", "ios_date").unwrap_or_default();
        let clock = group("clock", "ios_clock").unwrap_or_default();
        let rest = group("rest", "ios_rest").unwrap_or_default();
        let time = match group("meridiem", "ios_meridiem") {
            Some(meridiem) => format!("{clock} {meridiem}"),
            None => clock.to_string(),
        };

        let timestamp = self
            .parse_timestamp(date, &time)
            .ok_or_else(|| format!("timestamp '{date}, {time}' matches no configured format"))?;

        let (user, message) = match rest.split_once(": ") {
            Some((sender, body)) if !sender.trim().is_empty() => {
                (Sender::from_name(sender), body.to_string())
            }
            _ => (Sender::GroupNotification, rest.to_string()),
        };

        Ok(MessageRecord {
            timestamp,
            user,
            message,
        })
    }
}

/// Split a trailing AM/PM marker from a clock string
fn split_meridiem(time: &str) -> (&str, Option<&str>) {
    let trimmed = time.trim_end();
    if trimmed.len() >= 2 && trimmed.is_char_boundary(trimmed.len() - 2) {
        let (clock, suffix) = trimmed.split_at(trimmed.len() - 2);
        if suffix.eq_ignore_ascii_case("am") || suffix.eq_ignore_ascii_case("pm") {
            return (clock.trim_end(), Some(suffix));
        }
    }
    (trimmed, None)
}

fn finish(mut record: MessageRecord) -> MessageRecord {
    record.message = InputValidator::sanitize_text(&record.message);
    record
}
