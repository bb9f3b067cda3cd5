//! # Pwgen - Exhaustive sequence generator
//!
//! Pwgen enumerates every fixed-length string drawable from a configurable
//! character alphabet, in lexicographic order, either counting the sequences
//! or writing them out as candidate input for brute-force tools.
//!
//! ## Features
//!
//! - **Exhaustive Enumeration**: Recursive and iterative (odometer) strategies
//!   producing identical, lexicographically ordered output
//! - **Parallel Generation**: The first-symbol index space is partitioned
//!   across worker threads, each with its own private output sink
//! - **Live Progress**: Optional per-worker progress bars with instantaneous
//!   throughput and ETA
//! - **Pause/Resume**: Workers can be suspended and resumed without skewing
//!   elapsed-time accounting; interrupts tear the run down cleanly
//!
//! ## Quick Start
//!
//! ```bash
//! # Count every 4-symbol sequence over the short alphabet
//! pwgen count 4 --charset short
//!
//! # Write every 3-symbol sequence to per-worker files out-01, out-02, ...
//! pwgen write 3 --output out --workers 4
//! ```

pub mod alphabet;
pub mod cli;
pub mod config;
pub mod control;
pub mod generator;
pub mod parallel;
pub mod partition;

pub use alphabet::Alphabet;
pub use cli::{Cli, Output};
pub use config::PwgenConfig;

/// Result type alias for pwgen operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
