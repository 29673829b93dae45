//! Limits runs of blank lines.

use std::sync::LazyLock;

use regex::Regex;

use super::Modifier;

use crate::error::Result;

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:[ \t]*\r?\n){3,}").expect("valid newline pattern"));

/// Replaces three or more consecutive line breaks with a single blank line.
#[derive(Debug, Clone, Default)]
pub struct NewlineNormalizer;

impl NewlineNormalizer {
    pub fn new() -> Self {
        NewlineNormalizer
    }
}

impl Modifier for NewlineNormalizer {
    fn modify(&self, text: &str) -> Result<String> {
        Ok(EXCESS_NEWLINES.replace_all(text, "\n\n").into_owned())
    }

    fn name(&self) -> &'static str {
        "newline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_blank_runs() {
        let modifier = NewlineNormalizer::new();
        assert_eq!(modifier.modify("a\n\n\n\nb").unwrap(), "a\n\nb");
        assert_eq!(modifier.modify("a\r\n \r\n\r\nb").unwrap(), "a\n\nb");
        assert_eq!(modifier.modify("a\n\nb").unwrap(), "a\n\nb");
    }
}
