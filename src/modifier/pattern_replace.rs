use regex::Regex;

use super::Modifier;

use crate::error::{CuratorError, Result};

/// A modifier that replaces every match of a regex pattern.
#[derive(Debug, Clone)]
pub struct PatternReplacer {
    pattern: Regex,
    replacement: String,
}

impl PatternReplacer {
    /// Create a new pattern replacer. Invalid patterns are a configuration error.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern).map_err(|e| {
                CuratorError::configuration(format!("invalid pattern '{pattern}': {e}"))
            })?,
            replacement: replacement.to_string(),
        })
    }
}

impl Modifier for PatternReplacer {
    fn modify(&self, text: &str) -> Result<String> {
        Ok(self
            .pattern
            .replace_all(text, self.replacement.as_str())
            .into_owned())
    }

    fn name(&self) -> &'static str {
        "pattern_replace"
    }
}
