//! Error types for the curator library.
//!
//! Every fallible operation returns [`Result`], whose error is the
//! [`CuratorError`] enum. The variants follow how far a failure is allowed to
//! propagate:
//!
//! - [`CuratorError::Configuration`] and [`CuratorError::Consistency`] abort a
//!   whole run.
//! - [`CuratorError::Collaborator`] is fatal for one partition only.
//! - [`CuratorError::Transform`] is fatal for one document only.
//!
//! A fatal error raised while a stage processed a partition reaches the caller
//! wrapped in [`CuratorError::Stage`], which names both.
//!
//! # Examples
//!
//! ```
//! use curator::error::{CuratorError, Result};
//!
//! fn build() -> Result<()> {
//!     Err(CuratorError::configuration("num_bands must be positive"))
//! }
//!
//! let err = build().unwrap_err();
//! assert!(err.is_fatal());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for curator operations.
#[derive(Error, Debug)]
pub enum CuratorError {
    /// Invalid, missing or unknown options, caught at construction.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A modifier or filter failed on a single document.
    #[error("Transform error in stage '{stage}' on document '{document}': {message}")]
    Transform {
        stage: String,
        document: String,
        message: String,
    },

    /// A classification or storage backend failed for a partition.
    #[error("Collaborator error in stage '{stage}' on partition {partition}: {message}")]
    Collaborator {
        stage: String,
        partition: usize,
        message: String,
    },

    /// Document identity assumptions were violated.
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// A fatal error raised by a stage while processing a partition.
    #[error("Stage '{stage}' failed on partition {partition}: {source}")]
    Stage {
        stage: String,
        partition: usize,
        source: Box<CuratorError>,
    },

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Thread pool construction and join errors
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with CuratorError.
pub type Result<T> = std::result::Result<T, CuratorError>;

impl CuratorError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        CuratorError::Configuration(msg.into())
    }

    /// Create a new transform error for a single document.
    pub fn transform<S, D, M>(stage: S, document: D, message: M) -> Self
    where
        S: Into<String>,
        D: Into<String>,
        M: Into<String>,
    {
        CuratorError::Transform {
            stage: stage.into(),
            document: document.into(),
            message: message.into(),
        }
    }

    /// Create a new collaborator error for a partition.
    pub fn collaborator<S: Into<String>, M: Into<String>>(
        stage: S,
        partition: usize,
        message: M,
    ) -> Self {
        CuratorError::Collaborator {
            stage: stage.into(),
            partition,
            message: message.into(),
        }
    }

    /// Create a new consistency error.
    pub fn consistency<S: Into<String>>(msg: S) -> Self {
        CuratorError::Consistency(msg.into())
    }

    /// Attach the stage and partition a fatal error came from.
    pub fn stage<S: Into<String>>(stage: S, partition: usize, source: CuratorError) -> Self {
        CuratorError::Stage {
            stage: stage.into(),
            partition,
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through stage context.
    pub fn root_cause(&self) -> &CuratorError {
        match self {
            CuratorError::Stage { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        CuratorError::Other(msg.into())
    }

    /// Whether this error must abort the whole run rather than a single
    /// document or partition.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.root_cause(),
            CuratorError::Configuration(_) | CuratorError::Consistency(_)
        )
    }
}
