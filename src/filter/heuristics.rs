//! Heuristic quality filters over character and word statistics.

use unicode_segmentation::UnicodeSegmentation;

use super::DocumentFilter;

use crate::document::document::Document;
use crate::error::{CuratorError, Result};
use crate::modifier::url::URL_PATTERN;

fn check_ratio(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(CuratorError::configuration(format!(
            "{name} must be within [0, 1], got {value}"
        )));
    }
    Ok(())
}

/// Keeps documents whose mean word length (in characters) lies within bounds.
#[derive(Clone, Debug)]
pub struct MeanWordLengthFilter {
    min_length: f64,
    max_length: f64,
}

impl MeanWordLengthFilter {
    pub fn new(min_length: f64, max_length: f64) -> Result<Self> {
        if min_length < 0.0 || max_length < min_length {
            return Err(CuratorError::configuration(format!(
                "invalid mean word length bounds [{min_length}, {max_length}]"
            )));
        }
        Ok(MeanWordLengthFilter {
            min_length,
            max_length,
        })
    }
}

impl Default for MeanWordLengthFilter {
    fn default() -> Self {
        MeanWordLengthFilter {
            min_length: 3.0,
            max_length: 10.0,
        }
    }
}

impl DocumentFilter for MeanWordLengthFilter {
    fn score(&self, document: &Document) -> Result<f64> {
        let (words, chars) = document
            .text()
            .unicode_words()
            .fold((0usize, 0usize), |(w, c), word| (w + 1, c + word.chars().count()));
        if words == 0 {
            return Ok(0.0);
        }
        Ok(chars as f64 / words as f64)
    }

    fn keep_score(&self, score: f64) -> bool {
        score >= self.min_length && score <= self.max_length
    }

    fn name(&self) -> &str {
        "mean_word_length"
    }
}

/// Drops documents with too many `#` or ellipsis symbols per word.
#[derive(Clone, Debug)]
pub struct SymbolToWordRatioFilter {
    max_ratio: f64,
}

impl SymbolToWordRatioFilter {
    pub fn new(max_ratio: f64) -> Result<Self> {
        check_ratio("max_ratio", max_ratio)?;
        Ok(SymbolToWordRatioFilter { max_ratio })
    }
}

impl Default for SymbolToWordRatioFilter {
    fn default() -> Self {
        SymbolToWordRatioFilter { max_ratio: 0.1 }
    }
}

impl DocumentFilter for SymbolToWordRatioFilter {
    fn score(&self, document: &Document) -> Result<f64> {
        let text = document.text();
        let words = text.split_whitespace().count();
        if words == 0 {
            return Ok(0.0);
        }
        let symbols =
            text.matches('#').count() + text.matches("...").count() + text.matches('…').count();
        Ok(symbols as f64 / words as f64)
    }

    fn keep_score(&self, score: f64) -> bool {
        score <= self.max_ratio
    }

    fn name(&self) -> &str {
        "symbol_to_word"
    }
}

/// Drops documents where too many non-whitespace characters are neither
/// letters nor digits.
#[derive(Clone, Debug)]
pub struct NonAlphaNumericFilter {
    max_ratio: f64,
}

impl NonAlphaNumericFilter {
    pub fn new(max_ratio: f64) -> Result<Self> {
        check_ratio("max_ratio", max_ratio)?;
        Ok(NonAlphaNumericFilter { max_ratio })
    }
}

impl Default for NonAlphaNumericFilter {
    fn default() -> Self {
        NonAlphaNumericFilter { max_ratio: 0.25 }
    }
}

impl DocumentFilter for NonAlphaNumericFilter {
    fn score(&self, document: &Document) -> Result<f64> {
        let (total, other) = document
            .text()
            .chars()
            .filter(|c| !c.is_whitespace())
            .fold((0usize, 0usize), |(t, o), c| {
                (t + 1, o + usize::from(!c.is_alphanumeric()))
            });
        if total == 0 {
            return Ok(0.0);
        }
        Ok(other as f64 / total as f64)
    }

    fn keep_score(&self, score: f64) -> bool {
        score <= self.max_ratio
    }

    fn name(&self) -> &str {
        "non_alpha_numeric"
    }
}

/// Drops documents where URLs take up too large a share of the text (bytes).
#[derive(Clone, Debug)]
pub struct UrlRatioFilter {
    max_ratio: f64,
}

impl UrlRatioFilter {
    pub fn new(max_ratio: f64) -> Result<Self> {
        check_ratio("max_ratio", max_ratio)?;
        Ok(UrlRatioFilter { max_ratio })
    }
}

impl Default for UrlRatioFilter {
    fn default() -> Self {
        UrlRatioFilter { max_ratio: 0.2 }
    }
}

impl DocumentFilter for UrlRatioFilter {
    fn score(&self, document: &Document) -> Result<f64> {
        let text = document.text();
        if text.is_empty() {
            return Ok(0.0);
        }
        let url_bytes: usize = URL_PATTERN.find_iter(text).map(|m| m.len()).sum();
        Ok(url_bytes as f64 / text.len() as f64)
    }

    fn keep_score(&self, score: f64) -> bool {
        score <= self.max_ratio
    }

    fn name(&self) -> &str {
        "url_ratio"
    }
}

/// Phrases that mark navigation and legal boilerplate.
pub const DEFAULT_BOILERPLATE_PHRASES: [&str; 7] = [
    "lorem ipsum",
    "privacy policy",
    "terms of use",
    "cookie policy",
    "uses cookies",
    "use of cookies",
    "use cookies",
];

/// Drops documents where too many lines mention boilerplate phrases.
#[derive(Clone, Debug)]
pub struct BoilerplateStringFilter {
    phrases: Vec<String>,
    max_ratio: f64,
}

impl BoilerplateStringFilter {
    pub fn new<I, S>(phrases: I, max_ratio: f64) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        check_ratio("max_ratio", max_ratio)?;
        Ok(BoilerplateStringFilter {
            phrases: phrases.into_iter().map(|p| p.into().to_lowercase()).collect(),
            max_ratio,
        })
    }
}

impl Default for BoilerplateStringFilter {
    fn default() -> Self {
        BoilerplateStringFilter {
            phrases: DEFAULT_BOILERPLATE_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            max_ratio: 0.4,
        }
    }
}

impl DocumentFilter for BoilerplateStringFilter {
    fn score(&self, document: &Document) -> Result<f64> {
        let lines: Vec<String> = document
            .text()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_lowercase)
            .collect();
        if lines.is_empty() {
            return Ok(0.0);
        }
        let flagged = lines
            .iter()
            .filter(|line| self.phrases.iter().any(|p| line.contains(p.as_str())))
            .count();
        Ok(flagged as f64 / lines.len() as f64)
    }

    fn keep_score(&self, score: f64) -> bool {
        score <= self.max_ratio
    }

    fn name(&self) -> &str {
        "boilerplate_string"
    }
}
