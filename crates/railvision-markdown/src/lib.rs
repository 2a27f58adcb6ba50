//! Markdown tokenization shared by every document exporter.
//!
//! One tokenizer feeds the page-layout, word-processor and slide-deck
//! builders so the three export formats stay visually consistent.

mod inline;
mod tokenize;

pub use inline::parse_inline;
pub use tokenize::tokenize;
