//! URL removal.

use std::sync::LazyLock;

use regex::Regex;

use super::Modifier;

use crate::error::Result;

pub(crate) static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<>]+").expect("valid url pattern")
});

/// Removes URLs from text.
#[derive(Debug, Clone, Default)]
pub struct UrlRemover;

impl UrlRemover {
    pub fn new() -> Self {
        UrlRemover
    }
}

impl Modifier for UrlRemover {
    fn modify(&self, text: &str) -> Result<String> {
        Ok(URL_PATTERN.replace_all(text, "").into_owned())
    }

    fn name(&self) -> &'static str {
        "url_remove"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_urls() {
        let modifier = UrlRemover::new();
        assert_eq!(
            modifier
                .modify("see https://example.com/a?b=c and www.test.org now")
                .unwrap(),
            "see  and  now"
        );
        assert_eq!(modifier.modify("no links here").unwrap(), "no links here");
    }
}
