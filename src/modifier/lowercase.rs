//! Lowercase modifier implementation.

use super::Modifier;

use crate::error::Result;

/// A modifier that converts text to lowercase.
#[derive(Clone, Debug, Default)]
pub struct Lowercaser;

impl Lowercaser {
    /// Create a new lowercase modifier.
    pub fn new() -> Self {
        Lowercaser
    }
}

impl Modifier for Lowercaser {
    fn modify(&self, text: &str) -> Result<String> {
        Ok(text.to_lowercase())
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
