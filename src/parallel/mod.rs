//! Parallel generation framework
//!
//! Runs one enumerator per first-symbol partition on its own worker thread,
//! collects per-worker results over a channel, and aggregates totals. An
//! optional progress monitor samples each worker's live counter.

mod core;
mod progress;

pub use self::core::{AggregateResult, Coordinator, WorkerResult};
pub use self::progress::ProgressMonitor;

/// Default number of workers: one per detected CPU core
pub fn default_workers() -> usize {
    num_cpus::get().max(1)
}
