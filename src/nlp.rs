use anyhow::Result;
use regex::Regex;
use std::collections::HashSet;
use stop_words::{get, LANGUAGE};
use unicode_normalization::UnicodeNormalization;

use crate::config::AppConfig;

/// Romanized Hindi/Hinglish stop words common in chat exports
const HINGLISH_STOP_WORDS: &str = include_str!("../data/stop_hinglish.txt");

/// Longest emoji sequence we try to match, in chars (ZWJ families, tags)
const MAX_EMOJI_CHARS: usize = 12;

/// Text helpers shared by every token-, link- and emoji-based statistic
pub struct TextProcessor {
    url_regex: Regex,
    media_placeholder: String,
    stopwords: HashSet<String>,
}

impl TextProcessor {
    /// Create a processor with the given media sentinel and extra stop words
    pub fn new(media_placeholder: &str, extra_stop_words: &[String]) -> Result<Self> {
        let url_regex = Regex::new(r"https?://\S+|www\.\S+")
            .map_err(|e| anyhow::anyhow!("Failed to compile URL regex: {e}"))?;

        // English list, the bundled Hinglish list, then user additions
        let stopwords: HashSet<String> = get(LANGUAGE::English)
            .iter()
            .map(ToString::to_string)
            .chain(
                HINGLISH_STOP_WORDS
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(ToString::to_string),
            )
            .chain(extra_stop_words.iter().map(|word| word.trim().to_lowercase()))
            .collect();

        Ok(Self {
            url_regex,
            media_placeholder: media_placeholder.trim().to_string(),
            stopwords,
        })
    }

    /// Create a processor from the parser and analysis config sections
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.parser.media_placeholder,
            &config.analysis.extra_stop_words,
        )
    }

    /// True if the body is exactly the omitted-attachment sentinel
    #[must_use]
    pub fn is_media(&self, text: &str) -> bool {
        text.trim() == self.media_placeholder
    }

    /// True if `word` is in the stop-word set (case-insensitive)
    #[must_use]
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    /// Number of whitespace-separated tokens
    #[must_use]
    pub fn word_count(text: &str) -> usize {
        text.split_whitespace().count()
    }

    /// URLs found in the text
    pub fn links<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.url_regex.find_iter(text).map(|m| m.as_str())
    }

    /// Lowercased content words with stop words removed
    ///
    /// Leading and trailing punctuation is stripped from each token; tokens
    /// left empty (pure punctuation or emoji) are dropped.
    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = text.nfc().collect::<String>().to_lowercase();
        normalized
            .split_whitespace()
            .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|token| !token.is_empty() && !self.stopwords.contains(*token))
            .map(ToString::to_string)
            .collect()
    }

    /// Emoji found in the text, in order
    ///
    /// Matches the longest known sequence at each position so that skin-tone,
    /// flag and ZWJ sequences count once.
    #[must_use]
    pub fn extract_emojis(text: &str) -> Vec<&'static str> {
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(text.len()))
            .collect();

        let mut found = Vec::new();
        let mut start = 0;
        while start + 1 < boundaries.len() {
            let longest = (start + MAX_EMOJI_CHARS).min(boundaries.len() - 1);
            let matched = (start + 1..=longest).rev().find_map(|end| {
                emojis::get(&text[boundaries[start]..boundaries[end]]).map(|emoji| (emoji, end))
            });

            match matched {
                Some((emoji, end)) => {
                    found.push(emoji.as_str());
                    start = end;
                }
                None => start += 1,
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> TextProcessor {
        TextProcessor::new("<Media omitted>", &[]).expect("Failed to create text processor")
    }

    #[test]
    fn test_tokenize() {
        let processor = processor();

        let tokens = processor.tokenize("this is a guitar lesson with bananas");

        // Stopwords like "this", "is", "a", "with" should be removed
        assert!(!tokens.contains(&"this".to_string()));
        assert!(!tokens.contains(&"is".to_string()));
        assert!(!tokens.contains(&"with".to_string()));

        // Content words should remain
        assert!(tokens.contains(&"guitar".to_string()));
        assert!(tokens.contains(&"bananas".to_string()));
    }

    #[test]
    fn test_tokenize_strips_punctuation() {
        let tokens = processor().tokenize("Pizza!!! guitar, pizza?");
        assert_eq!(tokens, vec!["pizza", "guitar", "pizza"]);
    }

    #[test]
    fn test_links() {
        let processor = processor();
        let text = "see https://example.com and www.rust-lang.org now";
        assert_eq!(processor.links(text).count(), 2);
    }

    #[test]
    fn test_media() {
        assert!(processor().is_media("<Media omitted>\n"));
        assert!(!processor().is_media("a <Media omitted>"));
    }
}
