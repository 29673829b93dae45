//! Metadata value types attached to documents.
//!
//! Stages append labels to a document's metadata as they run: a language
//! classifier writes a [`MetaValue::Text`], a quality filter may record its
//! score as a [`MetaValue::Float`], and PII redaction records the detected
//! [`MetaValue::Spans`].
//!
//! ```
//! use curator::document::meta_value::{MetaValue, Span};
//!
//! let lang = MetaValue::Text("en".to_string());
//! assert_eq!(lang.as_text(), Some("en"));
//!
//! let spans = MetaValue::Spans(vec![Span::new(0, 5, "PERSON")]);
//! assert_eq!(spans.as_spans().map(|s| s.len()), Some(1));
//! ```

use serde::{Deserialize, Serialize};

/// A labelled byte range inside a document's text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Entity label, e.g. `EMAIL` or `PERSON`.
    pub label: String,
}

impl Span {
    /// Create a new span.
    pub fn new<S: Into<String>>(start: usize, end: usize, label: S) -> Self {
        Span {
            start,
            end,
            label: label.into(),
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Represents a value stored in a document's metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaValue {
    /// Text value
    Text(String),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// Multiple labels
    Labels(Vec<String>),
    /// Labelled text spans
    Spans(Vec<Span>),
}

impl MetaValue {
    /// Get the value as text, if it is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            MetaValue::Float(f) => Some(*f),
            MetaValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get the value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            MetaValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a boolean.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            MetaValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as a label list.
    pub fn as_labels(&self) -> Option<&[String]> {
        match self {
            MetaValue::Labels(labels) => Some(labels),
            _ => None,
        }
    }

    /// Get the value as a span list.
    pub fn as_spans(&self) -> Option<&[Span]> {
        match self {
            MetaValue::Spans(spans) => Some(spans),
            _ => None,
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Text(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Text(value)
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        MetaValue::Float(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        MetaValue::Integer(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Boolean(value)
    }
}
