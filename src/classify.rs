//! Classification collaborators.
//!
//! Language, domain and PII-entity models are consumed as black boxes that
//! map a batch of texts to a batch of labels or span lists. The library
//! never hardwires a model; a backend implements [`Classifier`] or
//! [`SpanDetector`] and is wrapped in a stage:
//!
//! - [`classification::ClassificationStage`] - annotates a label and optionally
//!   keeps only listed labels
//! - [`pii::PiiRedactionStage`] - replaces detected spans with `[LABEL]`
//!
//! Backend errors, and batches whose output length differs from the input,
//! fail the whole partition with [`CuratorError::Collaborator`]. Retrying is
//! left to the caller.
//!
//! [`CuratorError::Collaborator`]: crate::error::CuratorError::Collaborator

use crate::document::meta_value::Span;
use crate::error::Result;

pub mod classification;
pub mod pii;

pub use classification::ClassificationStage;
pub use pii::PiiRedactionStage;

/// Default number of texts handed to a backend per call.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// A backend that assigns one label per text.
pub trait Classifier: Send + Sync {
    /// Label every text in the batch. The output must have one entry per
    /// input, in input order.
    fn classify_batch(&self, texts: &[&str]) -> Result<Vec<String>>;

    /// Backend name used in logs.
    fn name(&self) -> &str;
}

/// A backend that finds labelled byte spans in each text.
pub trait SpanDetector: Send + Sync {
    /// Detect spans in every text in the batch. The output must have one
    /// entry per input, in input order.
    fn detect_batch(&self, texts: &[&str]) -> Result<Vec<Vec<Span>>>;

    /// Backend name used in logs.
    fn name(&self) -> &str;
}
