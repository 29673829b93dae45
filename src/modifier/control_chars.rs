//! Control character removal.

use super::Modifier;

use crate::error::Result;

/// Removes control characters except newline, carriage return and tab.
#[derive(Debug, Clone, Default)]
pub struct ControlCharRemover;

impl ControlCharRemover {
    pub fn new() -> Self {
        ControlCharRemover
    }
}

impl Modifier for ControlCharRemover {
    fn modify(&self, text: &str) -> Result<String> {
        Ok(text
            .chars()
            .filter(|&c| !c.is_control() || c == '\n' || c == '\r' || c == '\t')
            .collect())
    }

    fn name(&self) -> &'static str {
        "control_chars"
    }
}
