//! PII redaction stage.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::classify::{DEFAULT_BATCH_SIZE, SpanDetector};
use crate::document::corpus::Partition;
use crate::document::document::Document;
use crate::document::meta_value::{MetaValue, Span};
use crate::error::{CuratorError, Result};
use crate::stage::{PartitionOutcome, PartitionStage};

/// Metadata key holding the spans that were redacted.
pub const PII_SPANS_FIELD: &str = "pii_spans";

/// Runs a [`SpanDetector`] over a partition and replaces every detected span
/// with `[LABEL]`.
///
/// Spans are interpreted as byte offsets into the text the detector saw.
/// Overlapping spans are merged into the earliest one. The original spans
/// are kept in the [`PII_SPANS_FIELD`] metadata entry.
#[derive(Clone)]
pub struct PiiRedactionStage {
    detector: Arc<dyn SpanDetector>,
    batch_size: usize,
}

impl PiiRedactionStage {
    /// Create a new redaction stage.
    pub fn new(detector: Arc<dyn SpanDetector>) -> Self {
        PiiRedactionStage {
            detector,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the number of texts per backend call.
    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(CuratorError::configuration("batch_size must be positive"));
        }
        self.batch_size = batch_size;
        Ok(self)
    }

    fn detect_partition(&self, partition_index: usize, partition: &Partition) -> Result<Vec<Vec<Span>>> {
        let mut spans = Vec::with_capacity(partition.len());
        for batch in partition.documents().chunks(self.batch_size) {
            let texts: Vec<&str> = batch.iter().map(|d| d.text()).collect();
            let detected = self
                .detector
                .detect_batch(&texts)
                .map_err(|e| CuratorError::collaborator(self.name(), partition_index, e.to_string()))?;
            if detected.len() != texts.len() {
                return Err(CuratorError::collaborator(
                    self.name(),
                    partition_index,
                    format!(
                        "detector '{}' returned {} span lists for {} texts",
                        self.detector.name(),
                        detected.len(),
                        texts.len()
                    ),
                ));
            }
            spans.extend(detected);
        }
        Ok(spans)
    }

    fn redact_document(&self, document: &Document, mut spans: Vec<Span>) -> Result<Document> {
        spans.sort();
        let text = document.text();
        let mut redacted = String::with_capacity(text.len());
        let mut cursor = 0;

        for span in &spans {
            if span.start > span.end
                || span.end > text.len()
                || !text.is_char_boundary(span.start)
                || !text.is_char_boundary(span.end)
            {
                return Err(CuratorError::transform(
                    self.name(),
                    document.id(),
                    format!("span {}..{} is not a valid range of the text", span.start, span.end),
                ));
            }
            if span.start < cursor {
                // Overlaps a span that was already replaced.
                cursor = cursor.max(span.end);
                continue;
            }
            redacted.push_str(&text[cursor..span.start]);
            redacted.push('[');
            redacted.push_str(&span.label);
            redacted.push(']');
            cursor = span.end;
        }
        redacted.push_str(&text[cursor..]);

        document
            .with_text(redacted)
            .annotate(PII_SPANS_FIELD, MetaValue::Spans(spans))
    }
}

impl PartitionStage for PiiRedactionStage {
    fn name(&self) -> &str {
        "pii_redaction"
    }

    fn process(&self, partition_index: usize, partition: &Partition) -> Result<PartitionOutcome> {
        let spans = self.detect_partition(partition_index, partition)?;

        let mut documents = Vec::with_capacity(partition.len());
        let mut failures = Vec::new();
        let mut redacted_spans = 0usize;
        for (document, spans) in partition.documents().iter().zip(spans) {
            redacted_spans += spans.len();
            match self.redact_document(document, spans) {
                Ok(redacted) => documents.push(redacted),
                Err(error) => {
                    warn!(
                        stage = self.name(),
                        partition = partition_index,
                        document = document.id(),
                        %error,
                        "dropping document after redaction failure"
                    );
                    failures.push(error);
                }
            }
        }

        debug!(
            detector = self.detector.name(),
            partition = partition_index,
            spans = redacted_spans,
            "redacted partition"
        );
        Ok(PartitionOutcome::new(Partition::new(documents)).with_failures(failures))
    }
}

impl std::fmt::Debug for PiiRedactionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiiRedactionStage")
            .field("detector", &self.detector.name())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}
