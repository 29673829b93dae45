//! Text modifiers for cleaning and normalization.
//!
//! A [`Modifier`] is a pure `text -> text` function. Modifiers are composed
//! with [`sequential::Sequential`], which applies them in declared order and
//! isolates failures to the document that caused them.
//!
//! # Available Modifiers
//!
//! - [`unicode_normalize::UnicodeNormalizer`] - Unicode normalization (NFC, NFKC, ...)
//! - [`control_chars::ControlCharRemover`] - Control character removal
//! - [`html::HtmlStripper`] - HTML tag removal and entity decoding
//! - [`whitespace::WhitespaceNormalizer`] - Whitespace collapsing, paragraph preserving
//! - [`newline::NewlineNormalizer`] - Limits runs of blank lines
//! - [`url::UrlRemover`] - URL removal
//! - [`quotation::QuotationRemover`] - Strips wrapping quotes
//! - [`lowercase::Lowercaser`] - Lowercasing
//! - [`pattern_replace::PatternReplacer`] - Regex-based replacement
//! - [`line_remover::LineRemover`] - Drops exact boilerplate lines
//!
//! Every modifier must be deterministic: the same input always yields the same
//! output, since exact deduplication hashes the cleaned text. The built-in
//! modifiers are also fixed points on their own output, except
//! [`pattern_replace::PatternReplacer`] whose replacement may match its own
//! pattern again.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use curator::modifier::Modifier;
//! use curator::modifier::sequential::Sequential;
//! use curator::modifier::lowercase::Lowercaser;
//! use curator::modifier::whitespace::WhitespaceNormalizer;
//!
//! let pipeline = Sequential::new()
//!     .add_modifier(Arc::new(WhitespaceNormalizer::new()))
//!     .add_modifier(Arc::new(Lowercaser::new()));
//!
//! assert_eq!(pipeline.apply("  Hello   WORLD ").unwrap(), "hello world");
//! ```

use crate::error::Result;

/// Trait for pure text transformations.
pub trait Modifier: Send + Sync {
    /// Transform the input text.
    fn modify(&self, text: &str) -> Result<String>;

    /// Get the name of this modifier.
    fn name(&self) -> &'static str;
}

pub mod config;
pub mod control_chars;
pub mod html;
pub mod line_remover;
pub mod lowercase;
pub mod newline;
pub mod pattern_replace;
pub mod quotation;
pub mod sequential;
pub mod unicode_normalize;
pub mod url;
pub mod whitespace;

pub use config::ModifierConfig;
pub use sequential::Sequential;
