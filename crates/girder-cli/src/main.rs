// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Girder CLI
//!
//! Batch front end for the support-correlation engine: correlate a floor,
//! inspect a parsed report, print settings.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use girder_config_fs::FsConfigStore;
use girder_core::config::CORRELATION_CONFIG_KEY;
use girder_core::{ConfigService, CorrelationConfig, Engine, JsonGeometry, Report};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod table;

#[derive(Parser, Debug)]
#[command(author, version, about = "Beam-on-beam support correlation")]
struct Cli {
    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Correlate a floor's geometry with its analysis report
    Correlate {
        /// Geometry document (JSON, `{ "floors": [...] }`)
        #[arg(long)]
        geometry: PathBuf,
        /// Floor name (accents, case and `_` are ignored; prefixes match)
        #[arg(long)]
        floor: String,
        /// Report listing (latin-1 text)
        #[arg(long)]
        report: PathBuf,
        /// Settings file; defaults to the user config store
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the JSON result here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print a supports table instead of JSON
        #[arg(long, conflicts_with = "out")]
        table: bool,
    },
    /// Show what the report tokenizer reads from a listing
    Report {
        /// Report listing (latin-1 text)
        #[arg(long)]
        report: PathBuf,
        /// Settings file; defaults to the user config store
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the effective settings
    Config {
        /// Print the built-in defaults instead
        #[arg(long)]
        print_default: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    match cli.cmd {
        Command::Correlate {
            geometry,
            floor,
            report,
            config,
            out,
            table,
        } => {
            let config = load_config(config.as_deref())?;
            let engine = Engine::new(config)?;
            let report = Report::read(&report)
                .with_context(|| format!("reading report {}", report.display()))?;
            let provider = JsonGeometry::new(geometry);
            let result = engine.correlate(&provider, &floor, &report)?;
            if table {
                writeln!(stdout, "{}", table::supports(&result))?;
                return Ok(());
            }
            let json = serde_json::to_string_pretty(&result)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), "result written");
                }
                None => writeln!(stdout, "{json}")?,
            }
        }
        Command::Report { report, config } => {
            let config = load_config(config.as_deref())?;
            let parsed = Report::read(&report)
                .with_context(|| format!("reading report {}", report.display()))?;
            writeln!(
                stdout,
                "{}",
                table::report(&parsed, config.min_tie_demand)
            )?;
        }
        Command::Config { print_default } => {
            let config = if print_default {
                CorrelationConfig::default()
            } else {
                load_config(None)?
            };
            writeln!(stdout, "{}", serde_json::to_string_pretty(&config)?)?;
        }
    }
    Ok(())
}

/// Settings from `path`, else from the user config store, else defaults.
fn load_config(path: Option<&Path>) -> Result<CorrelationConfig> {
    if let Some(path) = path {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
        let config: CorrelationConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        debug!(path = %path.display(), "config loaded from file");
        return Ok(config);
    }
    match FsConfigStore::new() {
        Ok(store) => {
            debug!(path = %store.path_for(CORRELATION_CONFIG_KEY).display(), "config store");
            Ok(ConfigService::new(store).load_correlation()?)
        }
        Err(err) => {
            warn!(error = %err, "config store unavailable; using defaults");
            Ok(CorrelationConfig::default())
        }
    }
}
