//! Word cloud layout
//!
//! Produces positions and font sizes for the most frequent words; drawing
//! the result is left to the presentation layer. Words are tried in
//! frequency order along an Archimedean spiral from a jittered centre and
//! shrunk step by step when they do not fit. The largest font is lowered
//! until the words' boxes would cover at most half the canvas, and a word
//! never starts larger than the one placed before it. Given the same seed the
//! layout is identical.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

use crate::analysis::WordCount;
use crate::config::WordCloudConfig;
use crate::error::{ChatAnalysisError, Result};
use crate::validation::InputValidator;

/// Approximate glyph advance as a fraction of the font size
const GLYPH_WIDTH: f64 = 0.6;
/// Line height as a multiple of the font size
const LINE_HEIGHT: f64 = 1.2;
/// Radius growth per radian of the spiral
const SPIRAL_SPACING: f64 = 1.5;
const SPIRAL_STEPS: usize = 4000;
/// Fraction of words laid out vertically
const VERTICAL_RATIO: f64 = 0.1;
/// Font size decrement when a word does not fit
const FONT_STEP: u32 = 2;
/// Share of the canvas the unrotated text boxes may cover before sizes are scaled down
const FILL_RATIO: f64 = 0.5;

/// A word placed on the canvas
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedWord {
    /// The word as drawn
    pub text: String,
    /// Its frequency
    pub count: usize,
    /// Final font size, after any shrinking
    pub font_size: u32,
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Bounding box width, after rotation
    pub width: u32,
    /// Bounding box height, after rotation
    pub height: u32,
    /// Drawn top-to-bottom instead of left-to-right
    pub rotated: bool,
}

impl PlacedWord {
    fn overlaps(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        x < self.x + self.width
            && self.x < x + width
            && y < self.y + self.height
            && self.y < y + height
    }
}

/// A finished layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WordCloud {
    /// Canvas width
    pub width: u32,
    /// Canvas height
    pub height: u32,
    /// Words in placement order, most frequent first
    pub words: Vec<PlacedWord>,
}

impl WordCloud {
    /// True if nothing was placed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Lays out word frequencies on a fixed canvas
#[derive(Debug, Clone)]
pub struct WordCloudBuilder {
    config: WordCloudConfig,
}

impl WordCloudBuilder {
    /// Builder for a validated canvas and font range
    pub fn new(config: &WordCloudConfig) -> Result<Self> {
        InputValidator::validate_canvas(config.width, config.height)
            .and_then(|()| {
                InputValidator::validate_font_range(config.min_font_size, config.max_font_size)
            })
            .map_err(|e| ChatAnalysisError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            config: config.clone(),
        })
    }

    /// Lay out `words`, which must be sorted by count descending
    #[must_use]
    pub fn build(&self, words: &[WordCount]) -> WordCloud {
        let mut cloud = WordCloud {
            width: self.config.width,
            height: self.config.height,
            words: Vec::new(),
        };

        let candidates = &words[..words.len().min(self.config.max_words)];
        let Some(max_count) = candidates.iter().map(|w| w.count).max() else {
            return cloud;
        };
        let min_count = candidates.iter().map(|w| w.count).min().unwrap_or(max_count);

        let max_font = self.fitted_max_font(candidates, min_count, max_count);

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut ceiling = max_font;
        for word in candidates {
            let rotated = rng.gen_bool(VERTICAL_RATIO);
            let mut font_size = self
                .font_size(word.count, min_count, max_count, max_font)
                .min(ceiling);

            loop {
                if let Some(placed) = self.place(&cloud.words, word, font_size, rotated, &mut rng) {
                    cloud.words.push(placed);
                    break;
                }
                if font_size <= self.config.min_font_size {
                    tracing::trace!(word = %word.word, "No room left for word");
                    break;
                }
                font_size = font_size.saturating_sub(FONT_STEP).max(self.config.min_font_size);
            }
            ceiling = font_size;
        }

        cloud
    }

    /// Largest font at which the candidates' boxes cover at most `FILL_RATIO` of the canvas
    fn fitted_max_font(&self, words: &[WordCount], min_count: usize, max_count: usize) -> u32 {
        let budget = f64::from(self.config.width) * f64::from(self.config.height) * FILL_RATIO;
        let mut max_font = self.config.max_font_size;

        while max_font > self.config.min_font_size {
            let area: f64 = words
                .iter()
                .map(|word| {
                    let font_size = self.font_size(word.count, min_count, max_count, max_font);
                    let (width, height) = text_box(&word.word, font_size);
                    f64::from(width) * f64::from(height)
                })
                .sum();
            if area <= budget {
                break;
            }
            max_font = max_font.saturating_sub(FONT_STEP).max(self.config.min_font_size);
        }

        max_font
    }

    /// Linear scale from the count range onto `min_font_size..=max_font`
    fn font_size(&self, count: usize, min_count: usize, max_count: usize, max_font: u32) -> u32 {
        let min_font = self.config.min_font_size;
        if max_count == min_count {
            return max_font;
        }
        let ratio = count.saturating_sub(min_count) as f64 / (max_count - min_count) as f64;
        min_font + (ratio * f64::from(max_font.saturating_sub(min_font))).round() as u32
    }

    fn place(
        &self,
        placed: &[PlacedWord],
        word: &WordCount,
        font_size: u32,
        rotated: bool,
        rng: &mut StdRng,
    ) -> Option<PlacedWord> {
        let (text_width, text_height) = text_box(&word.word, font_size);
        let (width, height) = if rotated {
            (text_height, text_width)
        } else {
            (text_width, text_height)
        };

        if width > self.config.width || height > self.config.height {
            return None;
        }

        // Start near the centre, jittered so equal layouts do not stack
        let jitter_x = f64::from(self.config.width) * 0.1;
        let jitter_y = f64::from(self.config.height) * 0.1;
        let cx = f64::from(self.config.width) / 2.0 + rng.gen_range(-jitter_x..=jitter_x);
        let cy = f64::from(self.config.height) / 2.0 + rng.gen_range(-jitter_y..=jitter_y);

        let max_x = f64::from(self.config.width - width);
        let max_y = f64::from(self.config.height - height);

        (0..SPIRAL_STEPS).find_map(|step| {
            let theta = step as f64 * 0.1;
            let radius = SPIRAL_SPACING * theta;
            let left = cx + radius * theta.cos() - f64::from(width) / 2.0;
            let top = cy + radius * theta.sin() - f64::from(height) / 2.0;
            if !(0.0..=max_x).contains(&left) || !(0.0..=max_y).contains(&top) {
                return None;
            }

            let (x, y) = (left as u32, top as u32);
            if placed.iter().any(|other| other.overlaps(x, y, width, height)) {
                return None;
            }

            Some(PlacedWord {
                text: word.word.clone(),
                count: word.count,
                font_size,
                x,
                y,
                width,
                height,
                rotated,
            })
        })
    }
}

/// Unrotated bounding box of `text` at `font_size`
fn text_box(text: &str, font_size: u32) -> (u32, u32) {
    let chars = text.chars().count().max(1) as f64;
    let width = (chars * f64::from(font_size) * GLYPH_WIDTH).ceil() as u32;
    let height = (f64::from(font_size) * LINE_HEIGHT).ceil() as u32;
    (width, height)
}
