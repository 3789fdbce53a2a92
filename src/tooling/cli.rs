//! CLI Tooling
//!
//! Command-line front end: loads configuration, installs logging, and feeds
//! command lines from stdin or a script file into a [`Shell`].

use crate::config::{ConfigLoader, PathStoreConfig};
use crate::error::ApiError;
use crate::logging::init_logging;
use crate::store::Store;
use crate::tooling::shell::{OutputFormat, Outcome, Shell};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::info;

/// Pathstore CLI - hierarchical path-addressed key/value store
#[derive(Parser, Debug)]
#[command(name = "pathstore")]
#[command(about = "Hierarchical path-addressed key/value store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Result format (text or json)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Read commands from stdin (the default)
    Shell,
    /// Read commands from a script file
    Run {
        /// Script with one command per line
        script: PathBuf,
    },
    /// Print the effective configuration as JSON
    Config,
}

/// Resolved configuration plus the chosen output format
pub struct CliContext {
    config: PathStoreConfig,
    format: OutputFormat,
}

impl CliContext {
    /// Load configuration and fold the CLI logging flags into it
    pub fn new(cli: &Cli) -> Result<Self, ApiError> {
        let mut config = match &cli.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        if let Some(level) = &cli.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &cli.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &cli.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &cli.log_file {
            config.logging.file = Some(file.clone());
        }
        let format = cli.format.parse()?;
        Ok(CliContext { config, format })
    }

    pub fn from_config(config: PathStoreConfig, format: OutputFormat) -> Self {
        CliContext { config, format }
    }

    pub fn config(&self) -> &PathStoreConfig {
        &self.config
    }

    pub fn init_logging(&self) -> Result<(), ApiError> {
        init_logging(Some(&self.config.logging))
    }

    /// Run `command`, reading shell input from `stdin` when needed
    pub fn execute<R: BufRead, W: Write>(
        &self,
        command: &Commands,
        stdin: R,
        out: &mut W,
    ) -> Result<Outcome, ApiError> {
        match command {
            Commands::Shell => self.run_shell(stdin, out),
            Commands::Run { script } => {
                let file = File::open(script)?;
                self.run_shell(BufReader::new(file), out)
            }
            Commands::Config => {
                serde_json::to_writer_pretty(&mut *out, &self.config)?;
                writeln!(out)?;
                Ok(Outcome::Quit)
            }
        }
    }

    fn run_shell<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> Result<Outcome, ApiError> {
        let store = Store::with_config(&self.config.store);
        info!(
            bucket_count = self.config.store.bucket_count,
            max_nodes = ?self.config.store.max_nodes,
            "store ready"
        );
        let mut shell = Shell::new(store, self.format);
        let outcome = shell.run(input, out)?;
        out.flush()?;
        info!(?outcome, nodes = shell.store().len(), "session finished");
        Ok(outcome)
    }
}
