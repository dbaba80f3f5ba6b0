use metrics::{counter, histogram};
use std::time::{Duration, Instant};

/// Counter: records produced by the parser
pub const RECORDS_PARSED_TOTAL: &str = "chat_insights_records_parsed_total";
/// Counter: lines that ended up in no record
pub const LINES_DROPPED_TOTAL: &str = "chat_insights_lines_dropped_total";
/// Counter: lines appended to a previous message
pub const CONTINUATION_LINES_TOTAL: &str = "chat_insights_continuation_lines_total";
/// Histogram: seconds per parse
pub const PARSE_DURATION: &str = "chat_insights_parse_duration_seconds";
/// Counter: aggregations run, labelled by operation
pub const AGGREGATIONS_TOTAL: &str = "chat_insights_aggregations_total";
/// Histogram: seconds per aggregation, labelled by operation
pub const AGGREGATION_DURATION: &str = "chat_insights_aggregation_duration_seconds";
/// Counter: errors, labelled by type and operation
pub const ERRORS_TOTAL: &str = "chat_insights_errors_total";

/// Metrics collection for one analysis session
///
/// Counts are kept in-process for [`AnalysisMetrics::summary`] and also
/// forwarded to the `metrics` facade, so whichever recorder the host installs
/// sees them too.
#[derive(Debug, Default, Clone)]
pub struct AnalysisMetrics {
    /// Exports parsed
    pub parses_total: u64,
    /// Records produced
    pub records_parsed_total: u64,
    /// Orphan, failed-header and swallowed lines
    pub lines_dropped_total: u64,
    /// Lines joined onto a previous message
    pub continuation_lines_total: u64,
    /// Aggregations run
    pub aggregations_total: u64,
    /// Errors recorded
    pub errors_total: u64,
}

impl AnalysisMetrics {
    /// Record the outcome of one parse
    pub fn record_parse(&mut self, records: usize, dropped: usize, continuations: usize, duration: Duration) {
        self.parses_total += 1;
        self.records_parsed_total += records as u64;
        self.lines_dropped_total += dropped as u64;
        self.continuation_lines_total += continuations as u64;

        counter!(RECORDS_PARSED_TOTAL).increment(records as u64);
        counter!(LINES_DROPPED_TOTAL).increment(dropped as u64);
        counter!(CONTINUATION_LINES_TOTAL).increment(continuations as u64);
        histogram!(PARSE_DURATION).record(duration.as_secs_f64());
    }

    /// Record one aggregation run
    pub fn record_aggregation(&mut self, operation: &'static str, duration: Duration) {
        self.aggregations_total += 1;

        counter!(AGGREGATIONS_TOTAL, "operation" => operation).increment(1);
        histogram!(AGGREGATION_DURATION, "operation" => operation).record(duration.as_secs_f64());
    }

    /// Record error metrics
    pub fn record_error(&mut self, error_type: &'static str, operation: &'static str) {
        self.errors_total += 1;

        counter!(ERRORS_TOTAL, "type" => error_type, "operation" => operation).increment(1);
    }

    /// Human readable summary of the in-process counters
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Metrics Summary:\n\
             - Parses: {}\n\
             - Records parsed: {}\n\
             - Lines dropped: {}\n\
             - Continuation lines: {}\n\
             - Aggregations: {}\n\
             - Errors: {}",
            self.parses_total,
            self.records_parsed_total,
            self.lines_dropped_total,
            self.continuation_lines_total,
            self.aggregations_total,
            self.errors_total,
        )
    }
}

/// Performance timing wrapper for aggregations
pub struct MetricsTimer {
    /// Aggregation being timed
    pub operation: &'static str,
    start: Instant,
}

impl MetricsTimer {
    /// Start timing `operation`
    #[must_use]
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }

    /// Record the elapsed time as one aggregation
    pub fn finish(self, collector: &mut AnalysisMetrics) -> Duration {
        let duration = self.start.elapsed();
        collector.record_aggregation(self.operation, duration);
        duration
    }
}
