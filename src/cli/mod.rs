//! Command-line interface for tracker
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::{Config, CONFIG_FILE};
use crate::error::Result;
use crate::output::{emit_warning, OutputOptions};

mod config;
mod demo;
mod run;

/// tracker - in-memory tasks, epics and subtasks
///
/// Drives an in-memory task store: epics derive their status from their
/// subtasks and every lookup by id lands in a bounded view history.
#[derive(Parser, Debug)]
#[command(name = "tracker")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a config file (defaults to ./.tracker.toml when present)
    #[arg(long, global = true, env = "TRACKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log progress to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk through creating, viewing, updating and deleting items
    Demo,

    /// Run a TOML script of store operations against a fresh store
    Run {
        /// Script file with `[[step]]` entries
        script: PathBuf,
    },

    /// Configuration helpers
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write a default .tracker.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let options = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };
        let cwd = std::env::current_dir()?;
        let config = resolve_config(self.config.as_deref(), &cwd)?;
        tracing::debug!(?config, "resolved configuration");

        match self.command {
            Commands::Demo => demo::run(&config, options),
            Commands::Run { script } => run::run(&config, &script, options),
            Commands::Config(cmd) => match cmd {
                ConfigCommands::Show => config::run_show(&config, options),
                ConfigCommands::Init { force } => config::run_init(&cwd, force, options),
            },
        }
    }
}

/// An explicit config path must load cleanly; the implicit one falls back
/// to defaults with a warning.
fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::load(path);
    }
    match Config::discover(cwd) {
        Ok(config) => Ok(config.unwrap_or_default()),
        Err(err) => {
            emit_warning(&format!(
                "ignoring invalid {CONFIG_FILE}: {err}; using defaults"
            ));
            Ok(Config::default())
        }
    }
}
