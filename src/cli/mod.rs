//! Command-line interface for pwgen
//!
//! Provides the main CLI structure and command handling. Uses clap for
//! argument parsing; verbosity flags map onto the tracing filter.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::fmt;

pub mod commands;
mod output;

pub use output::Output;

/// Output format for run summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON format
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Pwgen - exhaustive sequence generator for brute-force tools
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format for the run summary
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Count every sequence of the given length without writing them
    Count(commands::count::CountArgs),
    /// Write every sequence of the given length to per-worker files
    Write(commands::write::WriteArgs),
    /// List the built-in character sets
    Charsets,
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        match self.command {
            Some(Commands::Count(args)) => {
                commands::count::execute(args, self.config.as_deref(), self.format, &output).await
            }
            Some(Commands::Write(args)) => {
                commands::write::execute(args, self.config.as_deref(), self.format, &output).await
            }
            Some(Commands::Charsets) => commands::charsets::execute(&output),
            None => {
                // Show help when no command is provided
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
