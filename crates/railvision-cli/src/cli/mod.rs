//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{self, ExportKind};

mod commands;

#[derive(Parser)]
#[command(name = "railvision")]
#[command(version = "0.1")]
#[command(about = "RailVision AI console tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Reassemble an assistant turn from a captured response stream
    Replay {
        /// Captured stream file (raw or `data:`-prefixed chunks)
        file: PathBuf,

        /// Print the merged state as JSON instead of a transcript
        #[arg(long)]
        json: bool,
    },
    /// Export a markdown document to one of the renderer models
    Export {
        /// Markdown input file
        input: PathBuf,

        /// Target format (default from config)
        #[arg(short, long, value_enum)]
        format: Option<ExportKind>,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Document title used to derive the filename (default: input stem)
        #[arg(long)]
        title: Option<String>,

        /// Override the layout width from config
        #[arg(long)]
        width: Option<usize>,
    },
    /// Inspect or clear the stored session blob
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

#[derive(clap::Subcommand)]
enum SessionCommands {
    /// Print the stored token/user blob
    Show,
    /// Delete the stored session
    Clear,
}

pub fn run() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = config::load().context("load config")?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Replay { file, json } => commands::replay::run(&file, json),
        Commands::Export {
            input,
            format,
            out,
            title,
            width,
        } => {
            let kind = format.unwrap_or(config.default_export_format);
            let width = width.unwrap_or(config.export_width);
            commands::export::run(&input, kind, out.as_deref(), title.as_deref(), width)
        }
        Commands::Session { command } => match command {
            SessionCommands::Show => commands::session::show(),
            SessionCommands::Clear => commands::session::clear(),
        },
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("RAILVISION_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
