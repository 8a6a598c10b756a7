//! Render a transaction activity feed from a JSON snapshot.
//!
//! Reads a `FeedInput` document (current user, transaction, messages, paging
//! flags), renders it with the built-in or a supplied message catalog, and
//! prints the result as text or JSON. Rendering anomalies are logged and never
//! abort the run.

mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use tracing::{debug, error, info, warn};

use tradefeed_common::i18n::Catalog;
use tradefeed_common::{render_feed, FeedError, FeedInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "tradefeed-render", about = "Render a transaction activity feed")]
struct Cli {
    /// JSON snapshot with current_user, transaction, messages and paging flags.
    #[arg(long)]
    input: PathBuf,

    /// JSON message catalog; keys it defines override the built-in English text.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Reference time for "today" labels (RFC 3339). Defaults to now.
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let catalog = Catalog::from_json(&json)
        .with_context(|| format!("parsing catalog {}", path.display()))?;
    info!("Loaded message catalog from {}", path.display());
    Ok(catalog)
}

fn load_input(path: &Path) -> Result<FeedInput> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading input {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing input {}", path.display()))
}

fn report(diagnostic: &FeedError) {
    match diagnostic {
        FeedError::UnknownTransition { transition } => {
            error!(transition_type = %transition, "Unknown transaction transition type");
        }
        other => warn!("{other}"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = load_catalog(cli.catalog.as_deref())?;
    let input = load_input(&cli.input)?;
    let now = cli.now.unwrap_or_else(Utc::now);

    debug!(
        transaction = %input.transaction.id,
        messages = input.messages.len(),
        transitions = input.transaction.transitions.len(),
        "Rendering feed"
    );
    let feed = render_feed(&input, &catalog, now);
    for diagnostic in &feed.diagnostics {
        report(diagnostic);
    }

    match cli.format {
        Format::Text => {
            let text = output::to_text(&feed).context("formatting feed")?;
            print!("{text}");
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(&feed).context("serializing feed")?;
            println!("{json}");
        }
    }
    Ok(())
}
