//! Word-processor block model (the DOCX-style consumer).
//!
//! Unlike the page layout, this consumer keeps per-segment styling: each
//! block carries styled runs the structured-document builder maps to its
//! own run objects.

use railvision_markdown::parse_inline;
use railvision_types::{Segment, Token};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum DocBlock {
    Heading {
        level: u8,
        runs: Vec<Segment>,
    },
    Paragraph {
        runs: Vec<Segment>,
    },
    ListItem {
        ordered: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        index: Option<u64>,
        level: usize,
        runs: Vec<Segment>,
    },
    Quote {
        /// One run list per quoted line.
        lines: Vec<Vec<Segment>>,
    },
    Code {
        #[serde(skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        text: String,
    },
    Table {
        rows: Vec<Vec<String>>,
    },
    Rule,
}

/// Maps tokens one-to-one onto document blocks.
pub fn build_document(tokens: &[Token]) -> Vec<DocBlock> {
    tokens
        .iter()
        .map(|token| match token {
            Token::Heading { level, text } => DocBlock::Heading {
                level: *level,
                runs: parse_inline(text),
            },
            Token::Paragraph { text } => DocBlock::Paragraph {
                runs: parse_inline(text),
            },
            Token::Bullet { level, text } => DocBlock::ListItem {
                ordered: false,
                index: None,
                level: *level,
                runs: parse_inline(text),
            },
            Token::Ordered { index, level, text } => DocBlock::ListItem {
                ordered: true,
                index: Some(*index),
                level: *level,
                runs: parse_inline(text),
            },
            Token::Blockquote { text } => DocBlock::Quote {
                lines: text.split('\n').map(parse_inline).collect(),
            },
            Token::Code { lang, text } => DocBlock::Code {
                lang: lang.clone(),
                text: text.clone(),
            },
            Token::Table { rows } => DocBlock::Table { rows: rows.clone() },
            Token::Hr => DocBlock::Rule,
        })
        .collect()
}
