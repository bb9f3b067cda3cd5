//! Command implementations for the pwgen CLI
//!
//! `count` and `write` share one pipeline: resolve settings from config
//! file and CLI flags, partition the first-symbol domain, run the
//! coordinator with a signal-driven controller, print the summary.

use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::alphabet::{Alphabet, CharsetKind};
use crate::cli::{Output, OutputFormat};
use crate::config::PwgenConfig;
use crate::control::{RunController, spawn_signal_watcher};
use crate::generator::Strategy;
use crate::parallel::{AggregateResult, Coordinator, default_workers};
use crate::partition::{Range, partition};

pub mod charsets;
pub mod count;
pub mod write;

/// Arguments shared by the generating commands
#[derive(Args)]
pub struct GenArgs {
    /// Sequence length (positive integer)
    #[arg(value_name = "LENGTH")]
    pub length: usize,

    /// Built-in character set
    #[arg(long, value_enum)]
    pub charset: Option<CharsetKind>,

    /// Custom character set file, one symbol per line
    #[arg(long, value_name = "FILE", conflicts_with = "charset")]
    pub charset_file: Option<PathBuf>,

    /// Number of parallel workers (default: detected CPU count)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Enumeration strategy
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,

    /// Show per-worker progress bars
    #[arg(long)]
    pub progress: bool,

    /// Progress sample interval in seconds
    #[arg(long, value_name = "SECS", requires = "progress")]
    pub progress_interval: Option<u64>,
}

/// Fully resolved run settings: defaults, then config file, then CLI flags
pub struct RunPlan {
    pub alphabet: Alphabet,
    pub length: usize,
    pub workers: usize,
    pub strategy: Strategy,
    pub progress: Option<Duration>,
}

impl GenArgs {
    pub fn resolve(&self, config: &PwgenConfig) -> Result<RunPlan> {
        if self.length == 0 {
            bail!("sequence length must be a positive integer");
        }

        let alphabet = match &self.charset_file {
            Some(path) => Alphabet::from_file(path)?,
            None => self.charset.unwrap_or(config.generator.charset).alphabet(),
        };

        let workers = self
            .workers
            .or(config.generator.workers)
            .unwrap_or_else(default_workers)
            .max(1);

        let progress = self.progress.then(|| {
            let secs = self
                .progress_interval
                .unwrap_or(config.generator.progress_interval_secs)
                .max(1);
            Duration::from_secs(secs)
        });

        Ok(RunPlan {
            alphabet,
            length: self.length,
            workers,
            strategy: self.strategy.unwrap_or(config.generator.strategy),
            progress,
        })
    }
}

impl RunPlan {
    /// Partition plan for this run
    pub fn ranges(&self) -> Vec<Range> {
        partition(self.alphabet.len(), self.workers)
    }

    /// Coordinator wired to a fresh controller driven by OS signals
    pub fn coordinator(&self) -> (Coordinator<'_>, Arc<RunController>) {
        let controller = Arc::new(RunController::new());
        let _ = spawn_signal_watcher(controller.clone());

        let mut coordinator = Coordinator::new(
            &self.alphabet,
            self.length,
            self.strategy,
            controller.clone(),
        );
        if let Some(interval) = self.progress {
            coordinator = coordinator.with_progress(interval);
        }
        (coordinator, controller)
    }
}

/// Print the run summary in the requested format
pub fn print_summary(
    result: &AggregateResult,
    format: OutputFormat,
    output: &Output,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            if result.workers.len() > 1 {
                for worker in &result.workers {
                    println!(
                        "worker {:2}: left {:2}, right {:2} | {} seqs in {:.3}s",
                        worker.worker_id,
                        worker.range.left,
                        worker.range.right,
                        worker.produced,
                        worker.elapsed.as_secs_f64()
                    );
                }
            }
            println!();
            println!(
                "Elapsed time (seconds):\t   {:.3}",
                result.wall_clock.as_secs_f64()
            );
            println!("Sequences generated:\t   {}", result.total);
            println!("Sequences/second:\t   {:.0}", result.throughput());
        }
        OutputFormat::Json => {
            let workers: Vec<serde_json::Value> = result
                .workers
                .iter()
                .map(|w| {
                    serde_json::json!({
                        "worker_id": w.worker_id,
                        "left": w.range.left,
                        "right": w.range.right,
                        "produced": w.produced.to_string(),
                        "elapsed_secs": w.elapsed.as_secs_f64(),
                        "write_errors": w.write_errors,
                    })
                })
                .collect();
            let summary = serde_json::json!({
                "total": result.total.to_string(),
                "wall_clock_secs": result.wall_clock.as_secs_f64(),
                "sequences_per_second": result.throughput(),
                "write_errors": result.write_errors,
                "workers": workers,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    if result.write_errors > 0 {
        output.warning(&format!(
            "{} sequence writes failed and were skipped",
            result.write_errors
        ));
    }
    Ok(())
}

/// Load the effective configuration for a command
pub fn load_config(config_path: Option<&str>) -> Result<PwgenConfig> {
    PwgenConfig::load(config_path).context("failed to load configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(length: usize) -> GenArgs {
        GenArgs {
            length,
            charset: None,
            charset_file: None,
            workers: None,
            strategy: None,
            progress: false,
            progress_interval: None,
        }
    }

    #[test]
    fn zero_length_is_rejected() {
        let config = PwgenConfig::default();
        assert!(args(0).resolve(&config).is_err());
    }

    #[test]
    fn cli_flags_override_config() {
        let mut config = PwgenConfig::default();
        config.generator.workers = Some(2);
        config.generator.strategy = Strategy::Recursive;

        let mut a = args(3);
        a.workers = Some(6);
        let plan = a.resolve(&config).unwrap();
        assert_eq!(plan.workers, 6);
        // strategy not set on the CLI falls back to the config file
        assert_eq!(plan.strategy, Strategy::Recursive);
    }

    #[test]
    fn default_charset_is_full() {
        let plan = args(2).resolve(&PwgenConfig::default()).unwrap();
        assert_eq!(plan.alphabet.len(), 88);
    }

    #[test]
    fn progress_interval_defaults_from_config() {
        let mut a = args(2);
        a.progress = true;
        let plan = a.resolve(&PwgenConfig::default()).unwrap();
        assert_eq!(plan.progress, Some(Duration::from_secs(20)));
    }
}
