//! Chat Insights - Chat Export Parsing and Statistics
//!
//! A Rust library that turns exported chat logs into structured records and
//! computes the statistics a chat dashboard displays.
//!
//! # Features
//!
//! - Parse Android and iOS style exports, including multi-line messages
//! - Configurable timestamp formats (12/24 hour, day or month first)
//! - Message, word, media and link counts per sender
//! - Monthly and daily timelines, weekday/month activity and heatmaps
//! - Busiest senders, common words, emoji usage and word cloud layout

/// Aggregations over parsed messages
pub mod analysis;
/// Configuration management
pub mod config;
/// Error types
pub mod error;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Text processing: tokens, stop words, links, emoji
pub mod nlp;
/// Export parsing
pub mod parser;
/// Per-upload analysis session
pub mod session;
/// Input validation and sanitization
pub mod validation;
/// Word cloud layout
pub mod wordcloud;

// Re-export key components for easier access
pub use analysis::ChatAnalyzer;
pub use config::AppConfig;
pub use error::{ChatAnalysisError, Result};
pub use models::{MessageCollection, MessageRecord, Sender, UserFilter};
pub use parser::{ChatParser, ParseReport};
pub use session::{AnalysisReport, AnalysisSession};
