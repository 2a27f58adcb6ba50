//! Export command: markdown in, renderer model out.
//!
//! Stands in for the browser download path: the sink here dumps the model
//! as JSON next to where a real renderer would save the binary file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use railvision_export::{
    DocumentSink, ExportOutcome, ExportPayload, LayoutLine, LayoutOptions, PrintFallback,
    export_with_fallback,
};
use tracing::debug;

use crate::config::ExportKind;

pub fn run(
    input: &Path,
    kind: ExportKind,
    out_dir: Option<&Path>,
    title: Option<&str>,
    width: usize,
) -> Result<()> {
    let markdown = fs::read_to_string(input)
        .with_context(|| format!("read markdown {}", input.display()))?;
    let fallback_title = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let title = title.unwrap_or(&fallback_title);

    let mut sink = JsonModelSink {
        dir: out_dir.unwrap_or_else(|| Path::new(".")).to_path_buf(),
        written: None,
    };
    let mut printer = StdoutPrinter;
    let opts = LayoutOptions { width };

    let outcome = export_with_fallback(
        &markdown,
        title,
        kind.into(),
        &opts,
        &mut sink,
        Some(&mut printer),
    );

    debug!(?outcome, input = %input.display(), "export finished");

    match outcome {
        ExportOutcome::Saved { filename } => {
            let path = sink.written.unwrap_or_else(|| PathBuf::from(&filename));
            println!("Exported {} -> {}", filename, path.display());
            Ok(())
        }
        ExportOutcome::PrintedViaFallback => {
            eprintln!("Renderer failed; printed the page layout instead.");
            Ok(())
        }
        ExportOutcome::Failed => anyhow::bail!("export failed for {}", input.display()),
    }
}

/// Debug sink: serializes the renderer model as pretty JSON.
struct JsonModelSink {
    dir: PathBuf,
    written: Option<PathBuf>,
}

impl DocumentSink for JsonModelSink {
    fn write(&mut self, filename: &str, payload: &ExportPayload<'_>) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create {}", self.dir.display()))?;
        let path = self.dir.join(format!("{filename}.json"));
        let raw = serde_json::to_string_pretty(payload).context("serialize export model")?;
        fs::write(&path, raw).with_context(|| format!("write {}", path.display()))?;
        self.written = Some(path);
        Ok(())
    }
}

/// Native-print stand-in: dumps layout lines to stdout.
struct StdoutPrinter;

impl PrintFallback for StdoutPrinter {
    fn print(&mut self, lines: &[LayoutLine]) -> Result<()> {
        for line in lines {
            println!("{}", line.text);
        }
        Ok(())
    }
}
