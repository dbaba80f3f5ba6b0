use anyhow::Result;
use config::{Config, Environment, File, FileFormat, FileSourceFile};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validation::InputValidator;

/// Application configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Export parsing settings
    pub parser: ParserConfig,
    /// Ranking limits and stop words
    pub analysis: AnalysisConfig,
    /// Word cloud canvas and fonts
    pub wordcloud: WordCloudConfig,
    /// Log level, file and format
    pub logging: LoggingConfig,
}

/// How export text is read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// chrono formats tried in order against "date time"
    pub timestamp_formats: Vec<String>,
    /// Body that marks an omitted attachment
    pub media_placeholder: String,
}

/// Ranking settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Senders listed by `most_busy_users`
    pub top_users: usize,
    /// Words listed by `most_common_words`
    pub top_words: usize,
    /// Stop words added to the built-in lists
    pub extra_stop_words: Vec<String>,
}

/// Word cloud layout settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordCloudConfig {
    /// Canvas width
    pub width: u32,
    /// Canvas height
    pub height: u32,
    /// Smallest font a word may shrink to
    pub min_font_size: u32,
    /// Largest font; lowered when many words must share the canvas
    pub max_font_size: u32,
    /// Most words considered for the layout
    pub max_words: usize,
    /// RNG seed; equal seeds give equal layouts
    pub seed: u64,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Daily rolling JSON log file, if any
    pub file_path: Option<String>,
    /// "text" or "json" console output
    pub format: String,
}

/// Timestamp layouts seen in exports. Two-digit years come first so that
/// `%Y` never swallows "23" as the year 23.
pub const DEFAULT_TIMESTAMP_FORMATS: [&str; 12] = [
    "%d/%m/%y %H:%M",
    "%d/%m/%Y %H:%M",
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%y %I:%M %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%d/%m/%y %I:%M %p",
    "%d/%m/%Y %I:%M %p",
    "%d/%m/%y %I:%M:%S %p",
    "%d/%m/%Y %I:%M:%S %p",
];

/// Body WhatsApp writes for an attachment left out of the export
pub const DEFAULT_MEDIA_PLACEHOLDER: &str = "<Media omitted>";

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            timestamp_formats: DEFAULT_TIMESTAMP_FORMATS
                .iter()
                .map(ToString::to_string)
                .collect(),
            media_placeholder: DEFAULT_MEDIA_PLACEHOLDER.to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_users: 5,
            top_words: 20,
            extra_stop_words: Vec::new(),
        }
    }
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            min_font_size: 10,
            max_font_size: 80,
            max_words: 200,
            seed: 42,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            format: "text".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        Self::load_layered([
            File::with_name("config/default").required(false),
            File::with_name("config/local").required(false),
        ])
    }

    /// Load defaults overridden by a single configuration file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::load_layered([File::from(path).required(true)])
    }

    fn load_layered(
        files: impl IntoIterator<Item = File<FileSourceFile, FileFormat>>,
    ) -> Result<Self> {
        // Defaults go in as the lowest-precedence YAML source
        let defaults = serde_yaml::to_string(&Self::default())
            .map_err(|e| anyhow::anyhow!("Failed to serialize default configuration: {e}"))?;

        let mut builder =
            Config::builder().add_source(File::from_str(&defaults, FileFormat::Yaml));
        for file in files {
            builder = builder.add_source(file);
        }

        let config = builder
            .add_source(Environment::with_prefix("CHAT_INSIGHTS").separator("__"))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {e}"))?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let app_config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| anyhow::anyhow!("Failed to parse YAML configuration: {e}"))?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate parser config
        if self.parser.timestamp_formats.is_empty() {
            return Err(anyhow::anyhow!("timestamp_formats must not be empty"));
        }
        for format in &self.parser.timestamp_formats {
            InputValidator::validate_timestamp_format(format)?;
        }
        if self.parser.media_placeholder.trim().is_empty() {
            return Err(anyhow::anyhow!("media_placeholder must not be empty"));
        }

        // Validate analysis config
        InputValidator::validate_top_n(self.analysis.top_users)?;
        InputValidator::validate_top_n(self.analysis.top_words)?;

        // Validate word cloud config
        InputValidator::validate_canvas(self.wordcloud.width, self.wordcloud.height)?;
        InputValidator::validate_font_range(
            self.wordcloud.min_font_size,
            self.wordcloud.max_font_size,
        )?;
        InputValidator::validate_top_n(self.wordcloud.max_words)?;

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        Ok(())
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}
