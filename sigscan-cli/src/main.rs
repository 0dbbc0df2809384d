//! Sigscan CLI - execute-signature inspector for Python node scripts

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use sigscan_core::config;
use sigscan_core::{render_json, render_text, scan_with_config, ScanOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sigscan")]
#[command(about = "Inspect Python node scripts and report execute() signatures")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a script file or scan a directory of scripts
    Inspect {
        /// Path to a script or a directory of scripts
        path: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip metadata header parsing
        #[arg(long)]
        no_headers: bool,

        /// Fail on the first script that cannot be inspected
        #[arg(long)]
        strict: bool,
    },
    /// Validate a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without running a scan
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect {
            path,
            format,
            config: config_path,
            no_headers,
            strict,
        } => {
            // Normalize path to absolute
            let normalized_path = if path.is_relative() {
                std::env::current_dir()?.join(&path)
            } else {
                path
            };

            if !normalized_path.exists() {
                anyhow::bail!("Path does not exist: {}", normalized_path.display());
            }

            // Config discovery starts next to the scripts being scanned
            let project_root = if normalized_path.is_file() {
                normalized_path
                    .parent()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| normalized_path.clone())
            } else {
                normalized_path.clone()
            };
            let resolved_config = config::load_and_resolve(&project_root, config_path.as_deref())
                .context("failed to load configuration")?;

            if let Some(config_path) = &resolved_config.config_path {
                eprintln!("Using config: {}", config_path.display());
            }

            let options = ScanOptions {
                headers: if no_headers { Some(false) } else { None },
                strict,
            };

            let reports = scan_with_config(&normalized_path, options, Some(&resolved_config))?;

            match format {
                OutputFormat::Text => print!("{}", render_text(&reports)),
                OutputFormat::Json => println!("{}", render_json(&reports)),
            }
        }
        Commands::Config { action } => handle_config(action)?,
    }

    Ok(())
}

fn handle_config(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Validate { path } => match locate_config(path)? {
            Some((_, source)) => println!("Configuration is valid: {}", source.display()),
            None => println!("No config file found (defaults in effect)"),
        },
        ConfigAction::Show { path } => {
            let (config, source) = match locate_config(path)? {
                Some((config, source)) => (config, Some(source)),
                None => (config::SigscanConfig::default(), None),
            };
            let resolved = config.resolve()?;
            match source {
                Some(path) => println!("source: {}", path.display()),
                None => println!("source: defaults"),
            }
            println!("include: {:?}", config.include);
            println!("exclude: {:?}", config.exclude);
            println!("headers: {}", resolved.headers);
        }
    }
    Ok(())
}

/// Load an explicit config path or discover one from the current directory
fn locate_config(
    path: Option<PathBuf>,
) -> anyhow::Result<Option<(config::SigscanConfig, PathBuf)>> {
    match path {
        Some(p) => Ok(Some((config::load_config_file(&p)?, p))),
        None => {
            let cwd = std::env::current_dir()?;
            Ok(config::discover_config(&cwd)?)
        }
    }
}
