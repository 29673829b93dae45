//! Boilerplate line removal.

use std::collections::HashSet;

use super::Modifier;

use crate::error::Result;

/// Drops every line whose trimmed content exactly matches a listed line.
#[derive(Debug, Clone)]
pub struct LineRemover {
    lines: HashSet<String>,
}

impl LineRemover {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LineRemover {
            lines: lines
                .into_iter()
                .map(|l| l.into().trim().to_string())
                .collect(),
        }
    }
}

impl Modifier for LineRemover {
    fn modify(&self, text: &str) -> Result<String> {
        Ok(text
            .split('\n')
            .filter(|line| !self.lines.contains(line.trim()))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn name(&self) -> &'static str {
        "line_remove"
    }
}
