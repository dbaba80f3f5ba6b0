//! Data models for parsed chat exports
//!
//! This module contains the record types produced by the parser and the
//! collection the aggregations run over.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sender string used for system and group notifications
pub const GROUP_NOTIFICATION: &str = "group_notification";

/// Selector value meaning "every sender"
pub const OVERALL: &str = "Overall";

/// English month names, indexed by `month - 1`
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Weekdays in display order, Monday first
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a weekday
#[must_use]
pub const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Full English name of a month (1-12)
#[must_use]
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
        .unwrap_or("Unknown")
}

/// Who sent a message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sender {
    /// A human participant
    User(String),
    /// System-generated line (joins, leaves, subject changes, ...)
    GroupNotification,
}

impl Sender {
    /// Build a sender from a raw name; blank names become notifications
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() || name == GROUP_NOTIFICATION {
            Self::GroupNotification
        } else {
            Self::User(name.to_string())
        }
    }

    /// The sender as displayed in tables
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::User(name) => name,
            Self::GroupNotification => GROUP_NOTIFICATION,
        }
    }

    /// True for system lines
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        matches!(self, Self::GroupNotification)
    }
}

impl From<String> for Sender {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<Sender> for String {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User(name) => name,
            Sender::GroupNotification => GROUP_NOTIFICATION.to_string(),
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message parsed from an export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// When the message was sent (export-local time)
    pub timestamp: NaiveDateTime,
    /// Sender name or the group notification sentinel
    pub user: Sender,
    /// Message body, continuation lines joined with `\n`
    pub message: String,
}

/// Calendar fields derived once from a record's timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedFields {
    /// Calendar date
    pub date: NaiveDate,
    /// Year
    pub year: i32,
    /// Month number (1-12)
    pub month: u32,
    /// English month name
    pub month_name: &'static str,
    /// Day of week
    pub weekday: Weekday,
    /// Hour of day (0-23)
    pub hour: u32,
    /// Minute of hour
    pub minute: u32,
}

impl DerivedFields {
    /// Compute the derived columns for a timestamp
    #[must_use]
    pub fn from_timestamp(timestamp: &NaiveDateTime) -> Self {
        Self {
            date: timestamp.date(),
            year: timestamp.year(),
            month: timestamp.month(),
            month_name: month_name(timestamp.month()),
            weekday: timestamp.weekday(),
            hour: timestamp.hour(),
            minute: timestamp.minute(),
        }
    }

    /// English weekday name
    #[must_use]
    pub const fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}

/// A record together with its derived columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRow {
    /// The parsed message
    pub record: MessageRecord,
    /// Precomputed calendar fields
    pub derived: DerivedFields,
}

impl MessageRow {
    /// Wrap a record, computing its derived fields
    #[must_use]
    pub fn new(record: MessageRecord) -> Self {
        let derived = DerivedFields::from_timestamp(&record.timestamp);
        Self { record, derived }
    }

    /// Sender of the message
    #[must_use]
    pub const fn user(&self) -> &Sender {
        &self.record.user
    }

    /// Message body
    #[must_use]
    pub fn message(&self) -> &str {
        &self.record.message
    }
}

/// First and last timestamp covered by a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// Timestamp of the first message
    pub start: NaiveDateTime,
    /// Timestamp of the last message
    pub end: NaiveDateTime,
}

/// Ordered messages of one export
///
/// Built once per load and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageCollection {
    rows: Vec<MessageRow>,
}

impl MessageCollection {
    /// Build a collection from records in export order
    #[must_use]
    pub fn new(records: Vec<MessageRecord>) -> Self {
        Self {
            rows: records.into_iter().map(MessageRow::new).collect(),
        }
    }

    /// Number of messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the export contained no valid messages
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in export order
    #[must_use]
    pub fn rows(&self) -> &[MessageRow] {
        &self.rows
    }

    /// Iterate over rows in export order
    pub fn iter(&self) -> std::slice::Iter<'_, MessageRow> {
        self.rows.iter()
    }

    /// Rows matching a user filter
    pub fn filter<'a>(&'a self, filter: &'a UserFilter) -> impl Iterator<Item = &'a MessageRow> + 'a {
        self.rows.iter().filter(move |row| filter.matches(row.user()))
    }

    /// Distinct human senders in order of first appearance
    #[must_use]
    pub fn users(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.rows
            .iter()
            .filter(|row| !row.user().is_notification())
            .map(|row| row.user().as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Span between the first and last message
    #[must_use]
    pub fn date_range(&self) -> Option<DateRange> {
        let first = self.rows.first()?;
        let last = self.rows.last()?;
        Some(DateRange {
            start: first.record.timestamp,
            end: last.record.timestamp,
        })
    }
}

impl<'a> IntoIterator for &'a MessageCollection {
    type Item = &'a MessageRow;
    type IntoIter = std::slice::Iter<'a, MessageRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Which messages an aggregation looks at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum UserFilter {
    /// Every message
    #[default]
    Overall,
    /// Only messages from one sender
    User(String),
}

impl UserFilter {
    /// Filter on one sender, whatever the name
    ///
    /// Unlike `UserFilter::from`, this never maps `"Overall"` to the
    /// unfiltered view.
    #[must_use]
    pub fn sender(name: impl Into<String>) -> Self {
        Self::User(name.into())
    }

    /// True if a message from `sender` passes the filter
    #[must_use]
    pub fn matches(&self, sender: &Sender) -> bool {
        match self {
            Self::Overall => true,
            Self::User(name) => sender.as_str() == name,
        }
    }

    /// True for the unfiltered view
    #[must_use]
    pub const fn is_overall(&self) -> bool {
        matches!(self, Self::Overall)
    }
}

/// Selector semantics: `"Overall"` is the unfiltered view, anything else a
/// sender. Use [`UserFilter::sender`] for a participant actually named
/// "Overall".
impl From<&str> for UserFilter {
    fn from(selected: &str) -> Self {
        if selected == OVERALL {
            Self::Overall
        } else {
            Self::User(selected.to_string())
        }
    }
}

impl fmt::Display for UserFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overall => f.write_str(OVERALL),
            Self::User(name) => f.write_str(name),
        }
    }
}
