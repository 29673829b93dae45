//! Declarative modifier configuration.
//!
//! Each variant names a built-in modifier and carries its typed options.
//! Unknown option names are rejected when the configuration is parsed.
//!
//! ```
//! use curator::modifier::config::ModifierConfig;
//!
//! let configs: Vec<ModifierConfig> = serde_json::from_str(
//!     r#"[{"type": "unicode_normalize", "form": "NFKC"}, {"type": "whitespace"}]"#,
//! ).unwrap();
//! let pipeline = ModifierConfig::build_sequential(&configs).unwrap();
//! assert_eq!(pipeline.modifiers().len(), 2);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::modifier::Modifier;
use crate::modifier::control_chars::ControlCharRemover;
use crate::modifier::html::HtmlStripper;
use crate::modifier::line_remover::LineRemover;
use crate::modifier::lowercase::Lowercaser;
use crate::modifier::newline::NewlineNormalizer;
use crate::modifier::pattern_replace::PatternReplacer;
use crate::modifier::quotation::QuotationRemover;
use crate::modifier::sequential::Sequential;
use crate::modifier::unicode_normalize::{NormalizationForm, UnicodeNormalizer};
use crate::modifier::url::UrlRemover;
use crate::modifier::whitespace::WhitespaceNormalizer;

/// Configuration for one built-in modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum ModifierConfig {
    UnicodeNormalize {
        #[serde(default)]
        form: NormalizationForm,
    },
    ControlChars,
    HtmlStrip,
    Whitespace,
    Newline,
    UrlRemove,
    QuotationRemove,
    Lowercase,
    PatternReplace {
        pattern: String,
        #[serde(default)]
        replacement: String,
    },
    LineRemove {
        lines: Vec<String>,
    },
}

impl ModifierConfig {
    /// Construct the modifier this configuration describes.
    pub fn build(&self) -> Result<Arc<dyn Modifier>> {
        let modifier: Arc<dyn Modifier> = match self {
            ModifierConfig::UnicodeNormalize { form } => Arc::new(UnicodeNormalizer::new(*form)),
            ModifierConfig::ControlChars => Arc::new(ControlCharRemover::new()),
            ModifierConfig::HtmlStrip => Arc::new(HtmlStripper::new()),
            ModifierConfig::Whitespace => Arc::new(WhitespaceNormalizer::new()),
            ModifierConfig::Newline => Arc::new(NewlineNormalizer::new()),
            ModifierConfig::UrlRemove => Arc::new(UrlRemover::new()),
            ModifierConfig::QuotationRemove => Arc::new(QuotationRemover::new()),
            ModifierConfig::Lowercase => Arc::new(Lowercaser::new()),
            ModifierConfig::PatternReplace {
                pattern,
                replacement,
            } => Arc::new(PatternReplacer::new(pattern, replacement)?),
            ModifierConfig::LineRemove { lines } => Arc::new(LineRemover::new(lines.clone())),
        };
        Ok(modifier)
    }

    /// Build a [`Sequential`] pipeline from configurations in order.
    pub fn build_sequential(configs: &[ModifierConfig]) -> Result<Sequential> {
        configs
            .iter()
            .try_fold(Sequential::new(), |pipeline, config| -> Result<Sequential> {
                Ok(pipeline.add_modifier(config.build()?))
            })
    }
}
