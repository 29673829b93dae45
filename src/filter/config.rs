//! Declarative filter configuration.
//!
//! ```
//! use curator::filter::{FilterConfig, FilterMode};
//!
//! let configs: Vec<FilterConfig> = serde_json::from_str(
//!     r#"[{"type": "word_count", "min_words": 5}, {"type": "terminal_punctuation"}]"#,
//! ).unwrap();
//! let chain = FilterConfig::build_chain(&configs, FilterMode::All).unwrap();
//! assert_eq!(chain.filters().len(), 2);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filter::DocumentFilter;
use crate::filter::chain::{FilterChain, FilterMode};
use crate::filter::heuristics::{
    BoilerplateStringFilter, DEFAULT_BOILERPLATE_PHRASES, MeanWordLengthFilter,
    NonAlphaNumericFilter, SymbolToWordRatioFilter, UrlRatioFilter,
};
use crate::filter::punctuation::{DEFAULT_TERMINATING_CHARS, TerminalPunctuationFilter};
use crate::filter::repetition::{RepeatedLinesFilter, RepeatingNgramFilter};
use crate::filter::word_count::{DEFAULT_MIN_WORDS, WordCountFilter};

fn default_min_words() -> usize {
    DEFAULT_MIN_WORDS
}

fn default_terminating_chars() -> Vec<char> {
    DEFAULT_TERMINATING_CHARS.to_vec()
}

fn default_repeated_lines_ratio() -> f64 {
    0.3
}

fn default_min_word_length() -> f64 {
    3.0
}

fn default_max_word_length() -> f64 {
    10.0
}

fn default_symbol_ratio() -> f64 {
    0.1
}

fn default_non_alpha_ratio() -> f64 {
    0.25
}

fn default_url_ratio() -> f64 {
    0.2
}

fn default_boilerplate_phrases() -> Vec<String> {
    DEFAULT_BOILERPLATE_PHRASES
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_boilerplate_ratio() -> f64 {
    0.4
}

/// Configuration for one built-in filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum FilterConfig {
    WordCount {
        #[serde(default = "default_min_words")]
        min_words: usize,
        #[serde(default)]
        max_words: Option<usize>,
    },
    TerminalPunctuation {
        #[serde(default = "default_terminating_chars")]
        terminating_chars: Vec<char>,
    },
    RepeatingNgram {
        n: usize,
        max_ratio: f64,
    },
    RepeatedLines {
        #[serde(default = "default_repeated_lines_ratio")]
        max_ratio: f64,
    },
    MeanWordLength {
        #[serde(default = "default_min_word_length")]
        min_length: f64,
        #[serde(default = "default_max_word_length")]
        max_length: f64,
    },
    SymbolToWord {
        #[serde(default = "default_symbol_ratio")]
        max_ratio: f64,
    },
    NonAlphaNumeric {
        #[serde(default = "default_non_alpha_ratio")]
        max_ratio: f64,
    },
    UrlRatio {
        #[serde(default = "default_url_ratio")]
        max_ratio: f64,
    },
    BoilerplateString {
        #[serde(default = "default_boilerplate_phrases")]
        phrases: Vec<String>,
        #[serde(default = "default_boilerplate_ratio")]
        max_ratio: f64,
    },
}

impl FilterConfig {
    /// The default repeated n-gram filters for n = 2, 3 and 4.
    pub fn default_repetition() -> Vec<FilterConfig> {
        RepeatingNgramFilter::defaults()
            .iter()
            .map(|f| FilterConfig::RepeatingNgram {
                n: f.n(),
                max_ratio: f.max_ratio(),
            })
            .collect()
    }

    /// Construct the filter this configuration describes.
    pub fn build(&self) -> Result<Arc<dyn DocumentFilter>> {
        let filter: Arc<dyn DocumentFilter> = match self {
            FilterConfig::WordCount {
                min_words,
                max_words: None,
            } => Arc::new(WordCountFilter::new(*min_words)),
            FilterConfig::WordCount {
                min_words,
                max_words: Some(max_words),
            } => Arc::new(WordCountFilter::with_bounds(*min_words, *max_words)?),
            FilterConfig::TerminalPunctuation { terminating_chars } => Arc::new(
                TerminalPunctuationFilter::new(terminating_chars.iter().copied())?,
            ),
            FilterConfig::RepeatingNgram { n, max_ratio } => {
                Arc::new(RepeatingNgramFilter::new(*n, *max_ratio)?)
            }
            FilterConfig::RepeatedLines { max_ratio } => {
                Arc::new(RepeatedLinesFilter::new(*max_ratio)?)
            }
            FilterConfig::MeanWordLength {
                min_length,
                max_length,
            } => Arc::new(MeanWordLengthFilter::new(*min_length, *max_length)?),
            FilterConfig::SymbolToWord { max_ratio } => {
                Arc::new(SymbolToWordRatioFilter::new(*max_ratio)?)
            }
            FilterConfig::NonAlphaNumeric { max_ratio } => {
                Arc::new(NonAlphaNumericFilter::new(*max_ratio)?)
            }
            FilterConfig::UrlRatio { max_ratio } => Arc::new(UrlRatioFilter::new(*max_ratio)?),
            FilterConfig::BoilerplateString { phrases, max_ratio } => Arc::new(
                BoilerplateStringFilter::new(phrases.iter().cloned(), *max_ratio)?,
            ),
        };
        Ok(filter)
    }

    /// Build a [`FilterChain`] from configurations in order.
    ///
    /// Two configurations that build filters with the same name are
    /// rejected; combine bounds into one filter instead.
    pub fn build_chain(configs: &[FilterConfig], mode: FilterMode) -> Result<FilterChain> {
        let chain = configs.iter().try_fold(
            FilterChain::new().with_mode(mode),
            |chain, config| -> Result<FilterChain> { Ok(chain.add_filter(config.build()?)) },
        )?;
        chain.validate()?;
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::document::Document;
    use crate::error::CuratorError;

    #[test]
    fn test_defaults_applied() {
        let config: FilterConfig = serde_json::from_str(r#"{"type": "word_count"}"#).unwrap();
        assert_eq!(
            config,
            FilterConfig::WordCount {
                min_words: 80,
                max_words: None
            }
        );

        let config: FilterConfig =
            serde_json::from_str(r#"{"type": "terminal_punctuation"}"#).unwrap();
        let filter = config.build().unwrap();
        assert!(filter.keep(&Document::new("a", "Done.")).unwrap());
        assert!(!filter.keep(&Document::new("b", "Not done")).unwrap());
    }

    #[test]
    fn test_invalid_values_rejected_at_build() {
        let config = FilterConfig::RepeatingNgram {
            n: 0,
            max_ratio: 0.2,
        };
        assert!(matches!(config.build(), Err(CuratorError::Configuration(_))));

        let config = FilterConfig::WordCount {
            min_words: 10,
            max_words: Some(5),
        };
        assert!(matches!(config.build(), Err(CuratorError::Configuration(_))));
    }

    #[test]
    fn test_unknown_option_rejected() {
        let parsed: std::result::Result<FilterConfig, _> =
            serde_json::from_str(r#"{"type": "word_count", "minimum": 3}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_duplicate_names_rejected_at_build() {
        let configs = vec![
            FilterConfig::RepeatingNgram {
                n: 2,
                max_ratio: 0.2,
            },
            FilterConfig::RepeatingNgram {
                n: 2,
                max_ratio: 0.5,
            },
        ];
        assert!(matches!(
            FilterConfig::build_chain(&configs, FilterMode::All),
            Err(CuratorError::Configuration(_))
        ));
    }

    #[test]
    fn test_default_repetition() {
        let configs = FilterConfig::default_repetition();
        assert_eq!(configs.len(), 3);
        let chain = FilterConfig::build_chain(&configs, FilterMode::All).unwrap();
        let looping = Document::new("A", "The cat sat. The cat sat. The cat sat.");
        assert!(!chain.keep(&looping).unwrap());
    }
}
