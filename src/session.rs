//! One uploaded export and everything computed from it
//!
//! A session is created per upload and replaced wholesale by the next one.
//! It owns the parsed collection and the analyzer, and hands out reports
//! for whichever sender the caller selects.

use serde::Serialize;
use tracing::{info, instrument};

use crate::analysis::{
    ActivityHeatmap, BusyUsers, CategoryCount, ChatAnalyzer, ChatStats, DailyPoint, EmojiCount,
    TimelinePoint, WordCount,
};
use crate::config::AppConfig;
use crate::error::{ChatAnalysisError, Result};
use crate::logging::OperationTimer;
use crate::metrics::{AnalysisMetrics, MetricsTimer};
use crate::models::{DateRange, MessageCollection, UserFilter, OVERALL};
use crate::parser::{ChatParser, ParseReport};
use crate::validation::InputValidator;
use crate::wordcloud::WordCloud;

/// Everything the dashboard shows for one selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// "Overall" or the selected sender
    pub selected_user: String,
    /// Span of the whole export
    pub date_range: Option<DateRange>,
    /// Headline counts
    pub stats: ChatStats,
    /// Messages per month, oldest first
    pub monthly_timeline: Vec<TimelinePoint>,
    /// Messages per day, oldest first
    pub daily_timeline: Vec<DailyPoint>,
    /// Weekdays, busiest first
    pub busy_days: Vec<CategoryCount>,
    /// Month names, busiest first
    pub busy_months: Vec<CategoryCount>,
    /// Weekday by hour counts
    pub heatmap: ActivityHeatmap,
    /// Only present for the overall view
    pub busy_users: Option<BusyUsers>,
    /// Most frequent content words
    pub common_words: Vec<WordCount>,
    /// Emoji, most used first
    pub emojis: Vec<EmojiCount>,
    /// Layout of the word cloud
    pub wordcloud: WordCloud,
}

impl AnalysisReport {
    /// Serialize the report for a presentation layer
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A loaded export
pub struct AnalysisSession {
    collection: MessageCollection,
    parse_report: ParseReport,
    analyzer: ChatAnalyzer,
    metrics: AnalysisMetrics,
}

impl AnalysisSession {
    /// Parse `text` and prepare it for analysis
    #[instrument(skip_all, fields(bytes = text.len()))]
    pub fn load(text: &str, config: &AppConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| ChatAnalysisError::InvalidConfig(e.to_string()))?;
        InputValidator::validate_export_size(text)
            .map_err(|e| ChatAnalysisError::Other(e.to_string()))?;

        let parser = ChatParser::from_config(&config.parser)?;
        let analyzer = ChatAnalyzer::new(config)?;

        let timer = OperationTimer::new("parse");
        let (collection, parse_report) = parser.parse_with_report(text);
        let elapsed = timer.finish();

        let mut metrics = AnalysisMetrics::default();
        metrics.record_parse(
            parse_report.records,
            parse_report.dropped_lines(),
            parse_report.continuation_lines,
            elapsed,
        );

        info!(
            messages = collection.len(),
            users = collection.users().len(),
            "Chat export loaded"
        );

        Ok(Self {
            collection,
            parse_report,
            analyzer,
            metrics,
        })
    }

    /// The parsed messages
    #[must_use]
    pub const fn collection(&self) -> &MessageCollection {
        &self.collection
    }

    /// What the parser kept and dropped
    #[must_use]
    pub const fn parse_report(&self) -> &ParseReport {
        &self.parse_report
    }

    /// The analyzer, for running single aggregations
    #[must_use]
    pub const fn analyzer(&self) -> &ChatAnalyzer {
        &self.analyzer
    }

    /// Counters collected so far
    #[must_use]
    pub const fn metrics(&self) -> &AnalysisMetrics {
        &self.metrics
    }

    /// Selector entries: "Overall" then human senders sorted by name
    #[must_use]
    pub fn users(&self) -> Vec<String> {
        let mut users: Vec<String> = self
            .collection
            .users()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        users.sort();
        users.insert(0, OVERALL.to_string());
        users
    }

    /// Turn a selector entry into a filter
    pub fn select(&mut self, selected: &str) -> Result<UserFilter> {
        if let Err(e) = InputValidator::validate_user_name(selected) {
            self.metrics.record_error("validation", "select");
            return Err(ChatAnalysisError::Other(e.to_string()));
        }
        Ok(UserFilter::from(selected))
    }

    /// Run every aggregation for `filter`
    pub fn report(&mut self, filter: &UserFilter) -> AnalysisReport {
        let collection = &self.collection;
        let analyzer = &self.analyzer;
        let metrics = &mut self.metrics;

        let stats = timed(metrics, "fetch_stats", || analyzer.fetch_stats(filter, collection));
        let monthly_timeline = timed(metrics, "monthly_timeline", || {
            analyzer.monthly_timeline(filter, collection)
        });
        let daily_timeline = timed(metrics, "daily_timeline", || {
            analyzer.daily_timeline(filter, collection)
        });
        let busy_days = timed(metrics, "week_activity_map", || {
            analyzer.week_activity_map(filter, collection)
        });
        let busy_months = timed(metrics, "month_activity_map", || {
            analyzer.month_activity_map(filter, collection)
        });
        let heatmap = timed(metrics, "activity_heatmap", || {
            analyzer.activity_heatmap(filter, collection)
        });
        let busy_users = filter
            .is_overall()
            .then(|| timed(metrics, "most_busy_users", || analyzer.most_busy_users(collection)));
        let common_words = timed(metrics, "most_common_words", || {
            analyzer.most_common_words(filter, collection)
        });
        let emojis = timed(metrics, "emoji_helper", || analyzer.emoji_helper(filter, collection));
        let wordcloud = timed(metrics, "create_wordcloud", || {
            analyzer.create_wordcloud(filter, collection)
        });

        AnalysisReport {
            selected_user: filter.to_string(),
            date_range: collection.date_range(),
            stats,
            monthly_timeline,
            daily_timeline,
            busy_days,
            busy_months,
            heatmap,
            busy_users,
            common_words,
            emojis,
            wordcloud,
        }
    }
}

fn timed<T>(metrics: &mut AnalysisMetrics, operation: &'static str, run: impl FnOnce() -> T) -> T {
    let timer = MetricsTimer::new(operation);
    let value = run();
    timer.finish(metrics);
    value
}
