//! Label annotation stage.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::classify::{Classifier, DEFAULT_BATCH_SIZE};
use crate::document::corpus::Partition;
use crate::error::{CuratorError, Result};
use crate::stage::{PartitionOutcome, PartitionStage};

/// Runs a [`Classifier`] over a partition in batches and stores each label
/// under `label_field`.
///
/// The stage is named `classify_{label_field}` so several classifiers in one
/// pipeline stay apart in reports.
#[derive(Clone)]
pub struct ClassificationStage {
    classifier: Arc<dyn Classifier>,
    label_field: String,
    name: String,
    batch_size: usize,
    keep_labels: Option<BTreeSet<String>>,
}

impl ClassificationStage {
    /// Create a stage writing labels to `label_field`.
    pub fn new<S: Into<String>>(classifier: Arc<dyn Classifier>, label_field: S) -> Result<Self> {
        let label_field = label_field.into();
        if label_field.is_empty() {
            return Err(CuratorError::configuration("label_field cannot be empty"));
        }
        Ok(ClassificationStage {
            classifier,
            name: format!("classify_{label_field}"),
            label_field,
            batch_size: DEFAULT_BATCH_SIZE,
            keep_labels: None,
        })
    }

    /// Set the number of texts per backend call.
    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(CuratorError::configuration("batch_size must be positive"));
        }
        self.batch_size = batch_size;
        Ok(self)
    }

    /// Keep only documents whose label is in `labels`.
    pub fn keep_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Set a custom name for this stage.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Get the metadata key labels are written to.
    pub fn label_field(&self) -> &str {
        &self.label_field
    }

    fn label_partition(&self, partition_index: usize, partition: &Partition) -> Result<Vec<String>> {
        let mut labels = Vec::with_capacity(partition.len());
        for batch in partition.documents().chunks(self.batch_size) {
            let texts: Vec<&str> = batch.iter().map(|d| d.text()).collect();
            let batch_labels = self
                .classifier
                .classify_batch(&texts)
                .map_err(|e| CuratorError::collaborator(self.name(), partition_index, e.to_string()))?;
            if batch_labels.len() != texts.len() {
                return Err(CuratorError::collaborator(
                    self.name(),
                    partition_index,
                    format!(
                        "classifier '{}' returned {} labels for {} texts",
                        self.classifier.name(),
                        batch_labels.len(),
                        texts.len()
                    ),
                ));
            }
            labels.extend(batch_labels);
        }
        Ok(labels)
    }
}

impl PartitionStage for ClassificationStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, partition_index: usize, partition: &Partition) -> Result<PartitionOutcome> {
        let labels = self.label_partition(partition_index, partition)?;

        let mut documents = Vec::with_capacity(partition.len());
        let mut failures = Vec::new();
        for (document, label) in partition.documents().iter().zip(labels) {
            if let Some(keep) = &self.keep_labels {
                if !keep.contains(&label) {
                    continue;
                }
            }
            match document.clone().annotate(self.label_field.clone(), label) {
                Ok(labelled) => documents.push(labelled),
                Err(error) => {
                    warn!(
                        stage = %self.name,
                        partition = partition_index,
                        document = document.id(),
                        %error,
                        "dropping document after classification failure"
                    );
                    failures.push(error);
                }
            }
        }

        debug!(
            stage = %self.name,
            classifier = self.classifier.name(),
            partition = partition_index,
            kept = documents.len(),
            total = partition.len(),
            "classified partition"
        );
        Ok(PartitionOutcome::new(Partition::new(documents)).with_failures(failures))
    }
}

impl std::fmt::Debug for ClassificationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationStage")
            .field("name", &self.name)
            .field("classifier", &self.classifier.name())
            .field("label_field", &self.label_field)
            .field("batch_size", &self.batch_size)
            .field("keep_labels", &self.keep_labels)
            .finish()
    }
}
