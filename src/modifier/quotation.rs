//! Removes quotes wrapping the whole text.

use super::Modifier;

use crate::error::Result;

/// Strips every pair of `"` surrounding the entire (trimmed) text.
///
/// Nested pairs are removed in one call, trimming between them, so the
/// output never starts and ends with a quote.
#[derive(Debug, Clone, Default)]
pub struct QuotationRemover;

impl QuotationRemover {
    pub fn new() -> Self {
        QuotationRemover
    }
}

impl Modifier for QuotationRemover {
    fn modify(&self, text: &str) -> Result<String> {
        let mut inner = text.trim();
        let mut stripped = false;
        while inner.len() >= 2 && inner.starts_with('"') && inner.ends_with('"') {
            inner = inner[1..inner.len() - 1].trim();
            stripped = true;
        }
        if stripped {
            Ok(inner.to_string())
        } else {
            Ok(text.to_string())
        }
    }

    fn name(&self) -> &'static str {
        "quotation_remove"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_wrapping_quotes() {
        let modifier = QuotationRemover::new();
        assert_eq!(modifier.modify(" \"quoted text\" ").unwrap(), "quoted text");
        assert_eq!(modifier.modify("say \"hi\"").unwrap(), "say \"hi\"");
        assert_eq!(modifier.modify("\"").unwrap(), "\"");
    }

    #[test]
    fn test_nested_quotes_removed_at_once() {
        let modifier = QuotationRemover::new();
        assert_eq!(modifier.modify("\"\"nested\"\"").unwrap(), "nested");
        assert_eq!(modifier.modify("\" \"spaced\" \"").unwrap(), "spaced");
        assert_eq!(modifier.modify("\"\"\"").unwrap(), "\"");
    }

    #[test]
    fn test_output_is_fixed_point() {
        let modifier = QuotationRemover::new();
        let inputs = [
            "\"\"nested\"\"",
            "\" \"spaced\" \"",
            "\"\" a \"\"",
            "\"\"\"",
            "say \"hi\"",
            "",
        ];
        for input in inputs {
            let once = modifier.modify(input).unwrap();
            let twice = modifier.modify(&once).unwrap();
            assert_eq!(once, twice, "quote removal must be a fixed point for {input:?}");
        }
    }
}
