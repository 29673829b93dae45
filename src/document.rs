//! Record model shared by every stage.
//!
//! - [`document::Document`] - id, text and append-only metadata
//! - [`meta_value::MetaValue`] - values stored in metadata
//! - [`corpus::Partition`] / [`corpus::Corpus`] - ordered units of work
//! - [`ids::IdAssigner`] - deterministic id assignment
//!
//! # Examples
//!
//! ```
//! use curator::document::corpus::Corpus;
//! use curator::document::ids::IdAssigner;
//!
//! let corpus = Corpus::from_texts(["first text", "second text"], 1);
//! let corpus = IdAssigner::new("web", 0).unwrap().assign(corpus).unwrap();
//!
//! assert_eq!(corpus.ids(), vec!["web-0000000000", "web-0000000001"]);
//! ```

pub mod corpus;
pub mod document;
pub mod ids;
pub mod meta_value;

pub use corpus::{Corpus, Partition};
pub use document::{Document, DocumentBuilder};
pub use ids::{IdAssigner, IdAssignmentConfig};
pub use meta_value::{MetaValue, Span};
