//! Aggregations over a parsed [`MessageCollection`]
//!
//! Every operation takes a [`UserFilter`] and the collection and returns
//! plain, serializable tables. Frequency rankings are sorted by count
//! descending with ties kept in order of first occurrence. An empty
//! (filtered) collection yields empty tables and zero counts.

use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::config::{AnalysisConfig, AppConfig, WordCloudConfig};
use crate::error::{ChatAnalysisError, Result};
use crate::models::{month_name, weekday_name, MessageCollection, MessageRow, UserFilter, WEEKDAYS};
use crate::nlp::TextProcessor;
use crate::validation::InputValidator;
use crate::wordcloud::{WordCloud, WordCloudBuilder};

/// Headline numbers for a view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChatStats {
    /// Messages in the view, notifications included
    pub messages: usize,
    /// Whitespace-separated words in human messages
    pub words: usize,
    /// Messages that are the media placeholder
    pub media: usize,
    /// URLs shared
    pub links: usize,
}

/// One month of the monthly timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    /// "January 2023"
    pub label: String,
    /// Calendar year
    pub year: i32,
    /// Month number (1-12)
    pub month: u32,
    /// Messages in the month
    pub count: usize,
}

/// One day of the daily timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    /// Calendar date
    pub date: NaiveDate,
    /// Messages on that date
    pub count: usize,
}

/// A category and how many messages fell into it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    /// Weekday, month or sender name
    pub label: String,
    /// Messages in the category
    pub count: usize,
}

/// A sender's share of all human messages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserShare {
    /// Sender name
    pub name: String,
    /// Percentage rounded to two decimals
    pub percent: f64,
}

/// Busiest senders of the whole chat
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BusyUsers {
    /// Top senders by message count
    pub top: Vec<CategoryCount>,
    /// Every sender with their percentage of messages
    pub shares: Vec<UserShare>,
}

/// A word and its frequency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    /// Lowercased token
    pub word: String,
    /// Occurrences
    pub count: usize,
}

/// An emoji and its frequency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmojiCount {
    /// The emoji sequence
    pub emoji: String,
    /// Occurrences
    pub count: usize,
}

/// Messages per weekday (rows, Monday first) and hour of day (columns)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityHeatmap {
    counts: [[usize; 24]; 7],
}

impl ActivityHeatmap {
    /// Messages sent on `day` during `hour`
    #[must_use]
    pub fn get(&self, day: Weekday, hour: u32) -> usize {
        self.counts[day.num_days_from_monday() as usize]
            .get(hour as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Row for one weekday, 24 hourly buckets
    #[must_use]
    pub fn row(&self, day: Weekday) -> &[usize; 24] {
        &self.counts[day.num_days_from_monday() as usize]
    }

    /// Sum over every cell
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// True if no message was counted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Column label for an hour bucket: "23-00", "00-1", "5-6"
    #[must_use]
    pub fn period_label(hour: u32) -> String {
        match hour {
            23 => "23-00".to_string(),
            0 => "00-1".to_string(),
            h => format!("{h}-{}", h + 1),
        }
    }

    fn add(&mut self, day: Weekday, hour: u32) {
        if let Some(cell) = self.counts[day.num_days_from_monday() as usize].get_mut(hour as usize) {
            *cell += 1;
        }
    }
}

/// Counts keys while remembering the order they first appeared in
#[derive(Debug)]
pub(crate) struct FrequencyCounter<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K: Eq + Hash + Clone> FrequencyCounter<K> {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, key: K) {
        if let Some(&slot) = self.index.get(&key) {
            self.entries[slot].1 += 1;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, 1));
        }
    }

    /// Entries by count descending; the sort is stable so ties keep first-seen order
    pub(crate) fn into_ranked(self) -> Vec<(K, usize)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for FrequencyCounter<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counter = Self::new();
        for key in iter {
            counter.add(key);
        }
        counter
    }
}

/// Computes every statistic the dashboard shows
pub struct ChatAnalyzer {
    text: TextProcessor,
    top_users: usize,
    top_words: usize,
    wordcloud: WordCloudBuilder,
}

impl ChatAnalyzer {
    /// Build an analyzer from the application config
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::with_processor(
            TextProcessor::from_config(config)?,
            &config.analysis,
            &config.wordcloud,
        )
    }

    /// Build an analyzer around an existing text processor
    ///
    /// Rejects limits and word cloud settings that `AppConfig::validate`
    /// would reject.
    pub fn with_processor(
        text: TextProcessor,
        analysis: &AnalysisConfig,
        wordcloud: &WordCloudConfig,
    ) -> Result<Self> {
        InputValidator::validate_top_n(analysis.top_users)
            .and_then(|()| InputValidator::validate_top_n(analysis.top_words))
            .map_err(|e| ChatAnalysisError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            text,
            top_users: analysis.top_users,
            top_words: analysis.top_words,
            wordcloud: WordCloudBuilder::new(wordcloud)?,
        })
    }

    /// The text helpers used for tokens, links and media
    #[must_use]
    pub const fn text(&self) -> &TextProcessor {
        &self.text
    }

    /// Message, word, media and link counts
    #[must_use]
    pub fn fetch_stats(&self, filter: &UserFilter, collection: &MessageCollection) -> ChatStats {
        collection.filter(filter).fold(ChatStats::default(), |mut stats, row| {
            stats.messages += 1;
            if !row.user().is_notification() {
                let body = row.message();
                stats.words += TextProcessor::word_count(body);
                stats.links += self.text.links(body).count();
                if self.text.is_media(body) {
                    stats.media += 1;
                }
            }
            stats
        })
    }

    /// Messages per calendar month, oldest first
    #[must_use]
    pub fn monthly_timeline(&self, filter: &UserFilter, collection: &MessageCollection) -> Vec<TimelinePoint> {
        let mut months: BTreeMap<(i32, u32), usize> = BTreeMap::new();
        for row in collection.filter(filter) {
            *months.entry((row.derived.year, row.derived.month)).or_insert(0) += 1;
        }

        months
            .into_iter()
            .map(|((year, month), count)| TimelinePoint {
                label: format!("{} {year}", month_name(month)),
                year,
                month,
                count,
            })
            .collect()
    }

    /// Messages per calendar date, oldest first
    #[must_use]
    pub fn daily_timeline(&self, filter: &UserFilter, collection: &MessageCollection) -> Vec<DailyPoint> {
        let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for row in collection.filter(filter) {
            *days.entry(row.derived.date).or_insert(0) += 1;
        }

        days.into_iter()
            .map(|(date, count)| DailyPoint { date, count })
            .collect()
    }

    /// Messages per weekday name, busiest first
    #[must_use]
    pub fn week_activity_map(&self, filter: &UserFilter, collection: &MessageCollection) -> Vec<CategoryCount> {
        ranked_labels(collection.filter(filter).map(|row| row.derived.weekday_name()))
    }

    /// Messages per month name, busiest first
    #[must_use]
    pub fn month_activity_map(&self, filter: &UserFilter, collection: &MessageCollection) -> Vec<CategoryCount> {
        ranked_labels(collection.filter(filter).map(|row| row.derived.month_name))
    }

    /// Weekday by hour message counts
    #[must_use]
    pub fn activity_heatmap(&self, filter: &UserFilter, collection: &MessageCollection) -> ActivityHeatmap {
        let mut heatmap = ActivityHeatmap::default();
        for row in collection.filter(filter) {
            heatmap.add(row.derived.weekday, row.derived.hour);
        }
        heatmap
    }

    /// Busiest senders across the whole chat
    ///
    /// Notifications are not senders and are left out, so the shares are
    /// relative to human messages and add up to 100.
    #[must_use]
    pub fn most_busy_users(&self, collection: &MessageCollection) -> BusyUsers {
        let ranked = collection
            .iter()
            .filter(|row| !row.user().is_notification())
            .map(|row| row.user().as_str())
            .collect::<FrequencyCounter<&str>>()
            .into_ranked();

        let total: usize = ranked.iter().map(|(_, count)| count).sum();
        if total == 0 {
            return BusyUsers::default();
        }

        let shares = ranked
            .iter()
            .map(|(name, count)| UserShare {
                name: (*name).to_string(),
                percent: round2(*count as f64 / total as f64 * 100.0),
            })
            .collect();

        let top = ranked
            .into_iter()
            .take(self.top_users)
            .map(|(name, count)| CategoryCount {
                label: name.to_string(),
                count,
            })
            .collect();

        BusyUsers { top, shares }
    }

    /// Lowercased content words of human, non-media messages
    #[must_use]
    pub fn word_tokens(&self, filter: &UserFilter, collection: &MessageCollection) -> Vec<String> {
        self.text_rows(filter, collection)
            .flat_map(|row| self.text.tokenize(row.message()))
            .collect()
    }

    /// Most frequent content words
    #[must_use]
    pub fn most_common_words(&self, filter: &UserFilter, collection: &MessageCollection) -> Vec<WordCount> {
        let mut words = self.word_frequencies(filter, collection);
        words.truncate(self.top_words);
        words
    }

    /// Emoji frequencies, most used first
    #[must_use]
    pub fn emoji_helper(&self, filter: &UserFilter, collection: &MessageCollection) -> Vec<EmojiCount> {
        collection
            .filter(filter)
            .filter(|row| !row.user().is_notification())
            .flat_map(|row| TextProcessor::extract_emojis(row.message()))
            .collect::<FrequencyCounter<&str>>()
            .into_ranked()
            .into_iter()
            .map(|(emoji, count)| EmojiCount {
                emoji: emoji.to_string(),
                count,
            })
            .collect()
    }

    /// Word cloud layout from the same token stream as the common words
    #[must_use]
    pub fn create_wordcloud(&self, filter: &UserFilter, collection: &MessageCollection) -> WordCloud {
        let words = self.word_frequencies(filter, collection);
        self.wordcloud.build(&words)
    }

    fn word_frequencies(&self, filter: &UserFilter, collection: &MessageCollection) -> Vec<WordCount> {
        self.word_tokens(filter, collection)
            .into_iter()
            .collect::<FrequencyCounter<String>>()
            .into_ranked()
            .into_iter()
            .map(|(word, count)| WordCount { word, count })
            .collect()
    }

    /// Rows whose text counts toward token statistics
    fn text_rows<'a>(
        &'a self,
        filter: &'a UserFilter,
        collection: &'a MessageCollection,
    ) -> impl Iterator<Item = &'a MessageRow> + 'a {
        collection
            .filter(filter)
            .filter(move |row| !row.user().is_notification() && !self.text.is_media(row.message()))
    }
}

fn ranked_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
    labels
        .collect::<FrequencyCounter<&str>>()
        .into_ranked()
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Weekday names in display order, for callers laying out the heatmap
#[must_use]
pub fn weekday_labels() -> [&'static str; 7] {
    WEEKDAYS.map(weekday_name)
}
