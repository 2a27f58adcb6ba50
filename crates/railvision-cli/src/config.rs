//! Configuration for the RailVision console tools.
//!
//! Loads from `${RAILVISION_HOME}/config.toml` with sensible defaults; a
//! missing file is not an error.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use railvision_export::ExportFormat;
use serde::{Deserialize, Serialize};

use crate::paths;

/// Export target selectable from config or the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// Page layout (PDF renderer path).
    #[default]
    Page,
    /// Word-processor document model.
    Document,
    /// Slide-deck model.
    Deck,
}

impl From<ExportKind> for ExportFormat {
    fn from(kind: ExportKind) -> Self {
        match kind {
            ExportKind::Page => ExportFormat::Page,
            ExportKind::Document => ExportFormat::Document,
            ExportKind::Deck => ExportFormat::Deck,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL for the admin console API.
    pub api_base_url: String,
    /// Line-width budget for the page-layout exporter.
    pub export_width: usize,
    /// Export format used when none is given on the command line.
    pub default_export_format: ExportKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            export_width: 80,
            default_export_format: ExportKind::Page,
        }
    }
}

pub fn load() -> Result<Config> {
    load_from(&paths::config_path())
}

pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read config at {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parse config at {}", path.display()))
}
