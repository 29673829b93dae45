//! The document record every stage operates on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::meta_value::MetaValue;
use crate::error::{CuratorError, Result};

/// A single text record flowing through the curation pipeline.
///
/// The `id` is fixed once assigned. Stages never mutate a document in place:
/// they derive a new value with [`Document::with_text`] or
/// [`Document::annotate`], so a failing stage leaves the input untouched.
/// Metadata is append-only; an existing key cannot be overwritten.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    id: String,
    text: String,
    #[serde(default)]
    metadata: BTreeMap<String, MetaValue>,
}

impl Document {
    /// Create a document with a known identifier.
    pub fn new<I: Into<String>, T: Into<String>>(id: I, text: T) -> Self {
        Document {
            id: id.into(),
            text: text.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Create a document that has not been assigned an identifier yet.
    pub fn from_text<T: Into<String>>(text: T) -> Self {
        Self::new(String::new(), text)
    }

    /// Create a builder for constructing documents.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    /// The document identifier. Empty until assigned.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether an identifier has been assigned.
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// The current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// All metadata entries, ordered by key.
    pub fn metadata(&self) -> &BTreeMap<String, MetaValue> {
        &self.metadata
    }

    /// Look up a metadata entry.
    pub fn get_meta(&self, key: &str) -> Option<&MetaValue> {
        self.metadata.get(key)
    }

    /// Derive a document with replaced text, keeping identity and metadata.
    pub fn with_text<T: Into<String>>(&self, text: T) -> Document {
        Document {
            id: self.id.clone(),
            text: text.into(),
            metadata: self.metadata.clone(),
        }
    }

    /// Derive a document with one more metadata entry.
    ///
    /// Fails if the key is already present.
    pub fn annotate<K: Into<String>, V: Into<MetaValue>>(
        mut self,
        key: K,
        value: V,
    ) -> Result<Document> {
        let key = key.into();
        if self.metadata.contains_key(&key) {
            return Err(CuratorError::transform(
                "annotate",
                self.id,
                format!("metadata key '{key}' is already set"),
            ));
        }
        self.metadata.insert(key, value.into());
        Ok(self)
    }

    pub(crate) fn with_id(mut self, id: String) -> Document {
        self.id = id;
        self
    }
}

/// A builder for constructing documents in a fluent manner.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    id: String,
    text: String,
    metadata: BTreeMap<String, MetaValue>,
}

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier.
    pub fn id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = id.into();
        self
    }

    /// Set the text.
    pub fn text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }

    /// Add a metadata entry. Later calls with the same key win.
    pub fn meta<K: Into<String>, V: Into<MetaValue>>(mut self, key: K, value: V) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Build the final document.
    pub fn build(self) -> Document {
        Document {
            id: self.id,
            text: self.text,
            metadata: self.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_text_keeps_identity() {
        let doc = Document::builder()
            .id("doc-1")
            .text("Hello")
            .meta("lang", "en")
            .build();
        let changed = doc.with_text("Hello world");

        assert_eq!(changed.id(), "doc-1");
        assert_eq!(changed.text(), "Hello world");
        assert_eq!(changed.get_meta("lang"), doc.get_meta("lang"));
        assert_eq!(doc.text(), "Hello");
    }

    #[test]
    fn test_annotate_is_append_only() {
        let doc = Document::new("a", "text")
            .annotate("lang", "en")
            .unwrap();
        assert_eq!(doc.get_meta("lang").and_then(|v| v.as_text()), Some("en"));

        let err = doc.annotate("lang", "fr").unwrap_err();
        assert!(matches!(err, CuratorError::Transform { .. }));
    }

    #[test]
    fn test_unassigned_id() {
        let doc = Document::from_text("no id yet");
        assert!(!doc.has_id());
        assert!(doc.with_id("x-1".to_string()).has_id());
    }

    #[test]
    fn test_json_without_id() {
        let doc: Document = serde_json::from_str(r#"{"text":"raw"}"#).unwrap();
        assert_eq!(doc.text(), "raw");
        assert!(!doc.has_id());
        assert!(doc.metadata().is_empty());
    }
}
