use anyhow::{anyhow, Result};
use chrono::format::{Item, StrftimeItems};

/// Largest export accepted in one load (bytes)
pub const MAX_EXPORT_BYTES: usize = 256 * 1024 * 1024;

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a sender name used as an analysis filter
    pub fn validate_user_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow!("User name cannot be empty"));
        }

        if name.chars().count() > 256 {
            return Err(anyhow!("User name too long (max 256 characters)"));
        }

        if name.contains('\0') || name.contains('\r') || name.contains('\n') {
            return Err(anyhow!("User name contains invalid characters"));
        }

        Ok(())
    }

    /// Validate a strftime-style timestamp format
    pub fn validate_timestamp_format(format: &str) -> Result<()> {
        if format.trim().is_empty() {
            return Err(anyhow!("Timestamp format cannot be empty"));
        }

        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(anyhow!("Timestamp format is not a valid strftime pattern: {format}"));
        }

        // A format without any numeric field could never match an export line
        let has_field = StrftimeItems::new(format).any(|item| matches!(item, Item::Numeric(..)));
        if !has_field {
            return Err(anyhow!("Timestamp format has no date or time fields: {format}"));
        }

        Ok(())
    }

    /// Validate a top-N limit
    pub fn validate_top_n(limit: usize) -> Result<()> {
        if limit == 0 {
            return Err(anyhow!("Limit must be greater than 0"));
        }

        if limit > 10_000 {
            return Err(anyhow!("Limit too large (max 10,000)"));
        }

        Ok(())
    }

    /// Validate word cloud canvas dimensions
    pub fn validate_canvas(width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(anyhow!("Canvas dimensions must be positive"));
        }

        if width > 8192 || height > 8192 {
            return Err(anyhow!("Canvas too large (max 8192x8192)"));
        }

        Ok(())
    }

    /// Validate a font size range
    pub fn validate_font_range(min: u32, max: u32) -> Result<()> {
        if min == 0 {
            return Err(anyhow!("Minimum font size must be positive"));
        }

        if min > max {
            return Err(anyhow!("Minimum font size cannot exceed maximum ({min} > {max})"));
        }

        Ok(())
    }

    /// Validate raw export text before parsing
    pub fn validate_export_size(text: &str) -> Result<()> {
        if text.len() > MAX_EXPORT_BYTES {
            return Err(anyhow!(
                "Export too large ({} bytes, max {MAX_EXPORT_BYTES})",
                text.len()
            ));
        }

        Ok(())
    }

    /// Sanitize text input
    #[must_use]
    pub fn sanitize_text(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t' || *c == '\r')
            .collect::<String>()
            .trim()
            .to_string()
    }
}
