//! Sequential composition of modifiers.
//!
//! Modifiers run in the order they were added, each receiving the previous
//! one's output. The first failing modifier aborts that document only; its
//! siblings in the partition keep going.

use std::sync::Arc;

use tracing::warn;

use crate::document::corpus::Partition;
use crate::document::document::Document;
use crate::error::{CuratorError, Result};
use crate::modifier::Modifier;
use crate::modifier::control_chars::ControlCharRemover;
use crate::modifier::unicode_normalize::{NormalizationForm, UnicodeNormalizer};
use crate::modifier::whitespace::WhitespaceNormalizer;
use crate::stage::{PartitionOutcome, PartitionStage};

/// An ordered chain of modifiers.
#[derive(Clone)]
pub struct Sequential {
    modifiers: Vec<Arc<dyn Modifier>>,
    name: String,
}

impl Sequential {
    /// Create an empty pipeline. An empty pipeline is the identity.
    pub fn new() -> Self {
        Sequential {
            modifiers: Vec::new(),
            name: "modify".to_string(),
        }
    }

    /// Control character removal, NFC normalization, whitespace collapsing.
    ///
    /// Control characters go first so that NFC sees the final character
    /// adjacency and a second pass has nothing left to compose.
    pub fn default_cleaning() -> Self {
        Self::new()
            .add_modifier(Arc::new(ControlCharRemover::new()))
            .add_modifier(Arc::new(UnicodeNormalizer::new(NormalizationForm::NFC)))
            .add_modifier(Arc::new(WhitespaceNormalizer::new()))
            .with_name("clean")
    }

    /// Add a modifier to the end of the pipeline.
    pub fn add_modifier(mut self, modifier: Arc<dyn Modifier>) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Set a custom name for this pipeline.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Get the modifiers in this pipeline.
    pub fn modifiers(&self) -> &[Arc<dyn Modifier>] {
        &self.modifiers
    }

    /// Whether the pipeline has no modifiers.
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Run every modifier over `text`, stopping at the first failure.
    pub fn apply(&self, text: &str) -> Result<String> {
        let mut current = text.to_string();
        for modifier in &self.modifiers {
            current = modifier.modify(&current)?;
        }
        Ok(current)
    }

    /// Run the pipeline over a document, producing a new document.
    ///
    /// Failures are reported as [`CuratorError::Transform`] naming the
    /// modifier and the document.
    pub fn apply_document(&self, document: &Document) -> Result<Document> {
        let mut current = document.text().to_string();
        for modifier in &self.modifiers {
            current = modifier.modify(&current).map_err(|e| {
                CuratorError::transform(modifier.name(), document.id(), e.to_string())
            })?;
        }
        Ok(document.with_text(current))
    }
}

impl Default for Sequential {
    fn default() -> Self {
        Self::new()
    }
}

impl PartitionStage for Sequential {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, partition_index: usize, partition: &Partition) -> Result<PartitionOutcome> {
        let mut documents = Vec::with_capacity(partition.len());
        let mut failures = Vec::new();

        for document in partition.documents() {
            match self.apply_document(document) {
                Ok(modified) => documents.push(modified),
                Err(error) => {
                    warn!(
                        stage = %self.name,
                        partition = partition_index,
                        document = document.id(),
                        %error,
                        "dropping document after modifier failure"
                    );
                    failures.push(error);
                }
            }
        }

        Ok(PartitionOutcome::new(Partition::new(documents)).with_failures(failures))
    }
}

impl std::fmt::Debug for Sequential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequential")
            .field("name", &self.name)
            .field(
                "modifiers",
                &self.modifiers.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
