//! Document export: one markdown tokenization feeding three renderer
//! models, plus the driver that hands them to an external sink.
//!
//! The binary formats (PDF/DOCX/PPTX) are owned by the renderers behind
//! [`DocumentSink`]; this crate owns everything up to that seam.

pub mod deck;
pub mod document;
pub mod layout;

use anyhow::Result;
use railvision_markdown::tokenize;
use tracing::warn;

pub use deck::{Slide, build_deck};
pub use document::{DocBlock, build_document};
pub use layout::{Emphasis, LayoutLine, LayoutOptions, LineKind, build_layout};

/// Target export format. `Page` is the layout/PDF path, the only one with
/// a print fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Page,
    Document,
    Deck,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Page => "pdf",
            ExportFormat::Document => "docx",
            ExportFormat::Deck => "pptx",
        }
    }
}

/// Renderer model handed to a sink, borrowed per export invocation.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportPayload<'a> {
    Page(&'a [LayoutLine]),
    Document(&'a [DocBlock]),
    Deck(&'a [Slide]),
}

/// The external renderer seam: takes a derived filename and a model,
/// produces the binary file and triggers the save action.
pub trait DocumentSink {
    fn write(&mut self, filename: &str, payload: &ExportPayload<'_>) -> Result<()>;
}

/// Native print dialog hook, attempted when the page renderer fails.
pub trait PrintFallback {
    fn print(&mut self, lines: &[LayoutLine]) -> Result<()>;
}

/// Result of one export attempt. Failures are reported, never panicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved { filename: String },
    PrintedViaFallback,
    Failed,
}

/// Derives a download filename from a document title: lowercased, every
/// non-alphanumeric character replaced with `_`.
pub fn export_filename(title: &str, ext: &str) -> String {
    let stem: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let stem = if stem.chars().all(|c| c == '_') {
        "document".to_string()
    } else {
        stem
    };
    format!("{stem}.{ext}")
}

/// Tokenizes the markdown, builds the model for `format` and writes it to
/// the sink. Token and segment lists are recomputed per invocation.
///
/// A sink failure is logged and reported as an outcome; for the page path
/// the print fallback is attempted first. Never propagates an error to the
/// caller, so a failed export cannot take the host view down.
pub fn export_with_fallback(
    markdown: &str,
    title: &str,
    format: ExportFormat,
    opts: &LayoutOptions,
    sink: &mut dyn DocumentSink,
    mut fallback: Option<&mut dyn PrintFallback>,
) -> ExportOutcome {
    let tokens = tokenize(markdown);
    let filename = export_filename(title, format.extension());

    let payload = match format {
        ExportFormat::Page => Payload::Page(build_layout(&tokens, opts)),
        ExportFormat::Document => Payload::Document(build_document(&tokens)),
        ExportFormat::Deck => Payload::Deck(build_deck(&tokens)),
    };

    let result = match &payload {
        Payload::Page(lines) => sink.write(&filename, &ExportPayload::Page(lines)),
        Payload::Document(blocks) => sink.write(&filename, &ExportPayload::Document(blocks)),
        Payload::Deck(slides) => sink.write(&filename, &ExportPayload::Deck(slides)),
    };

    match result {
        Ok(()) => ExportOutcome::Saved { filename },
        Err(err) => {
            warn!(error = %err, format = ?format, "export sink failed");
            if let (Payload::Page(lines), Some(fb)) = (&payload, fallback.as_deref_mut()) {
                if fb.print(lines).is_ok() {
                    return ExportOutcome::PrintedViaFallback;
                }
                warn!("print fallback failed as well");
            }
            ExportOutcome::Failed
        }
    }
}

/// Owned counterpart of [`ExportPayload`] used inside the driver.
enum Payload {
    Page(Vec<LayoutLine>),
    Document(Vec<DocBlock>),
    Deck(Vec<Slide>),
}
