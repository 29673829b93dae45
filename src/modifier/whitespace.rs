//! Whitespace normalization.

use super::Modifier;

use crate::error::Result;

/// Collapses whitespace while keeping paragraph breaks.
///
/// Consecutive non-blank lines form a paragraph; inside a paragraph every run
/// of whitespace (including single line breaks) becomes one space. Paragraphs
/// are separated by exactly one blank line and the result is trimmed.
#[derive(Debug, Clone, Default)]
pub struct WhitespaceNormalizer;

impl WhitespaceNormalizer {
    pub fn new() -> Self {
        WhitespaceNormalizer
    }
}

impl Modifier for WhitespaceNormalizer {
    fn modify(&self, text: &str) -> Result<String> {
        let mut paragraphs: Vec<String> = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.lines() {
            let mut words = line.split_whitespace().peekable();
            if words.peek().is_none() {
                if !current.is_empty() {
                    paragraphs.push(current.join(" "));
                    current.clear();
                }
                continue;
            }
            current.extend(words);
        }
        if !current.is_empty() {
            paragraphs.push(current.join(" "));
        }

        Ok(paragraphs.join("\n\n"))
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}
