//! Worker coordination and result aggregation

use anyhow::{Context, Result};
use crossbeam::channel::bounded;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::alphabet::Alphabet;
use crate::control::{Cancelled, RunController};
use crate::generator::{Enumerator, Strategy, WorkerContext};
use crate::partition::Range;

use super::ProgressMonitor;

/// Result reported by one worker at completion
///
/// `elapsed` is compute time, with suspended intervals already excluded.
#[derive(Debug, Clone)]
pub struct WorkerResult {
    pub worker_id: usize,
    pub range: Range,
    pub produced: u128,
    pub write_errors: u64,
    pub elapsed: Duration,
}

/// Aggregated outcome of a whole run
#[derive(Debug, Clone)]
pub struct AggregateResult {
    /// Total sequences across all workers
    pub total: u128,
    /// Total failed sink writes across all workers
    pub write_errors: u64,
    /// Coordinator wall-clock span, first worker start to last join
    pub wall_clock: Duration,
    /// Slowest worker's compute time, kept for information
    pub max_worker_elapsed: Duration,
    pub workers: Vec<WorkerResult>,
}

impl AggregateResult {
    /// Aggregate throughput in sequences per wall-clock second
    pub fn throughput(&self) -> f64 {
        let secs = self.wall_clock.as_secs_f64();
        if secs > 0.0 {
            self.total as f64 / secs
        } else {
            0.0
        }
    }
}

/// Runs one enumerator per partition concurrently and aggregates results
///
/// Workers are scoped threads sharing the alphabet read-only; each owns its
/// private sink. Results travel back over a bounded channel, one fixed-size
/// record per worker. Any worker failure (or cancellation) poisons the
/// whole run.
pub struct Coordinator<'a> {
    alphabet: &'a Alphabet,
    length: usize,
    strategy: Strategy,
    controller: Arc<RunController>,
    progress_interval: Option<Duration>,
}

impl<'a> Coordinator<'a> {
    pub fn new(
        alphabet: &'a Alphabet,
        length: usize,
        strategy: Strategy,
        controller: Arc<RunController>,
    ) -> Self {
        Self {
            alphabet,
            length,
            strategy,
            controller,
            progress_interval: None,
        }
    }

    /// Enable the per-worker progress monitor with the given sample interval
    pub fn with_progress(mut self, interval: Duration) -> Self {
        self.progress_interval = Some(interval);
        self
    }

    /// Count-only run over the given partitions
    pub fn count(&self, ranges: &[Range]) -> Result<AggregateResult> {
        let sinks = ranges.iter().map(|_| None::<std::io::Sink>).collect();
        self.run(ranges, sinks)
    }

    /// Emit run: `make_sink(worker_id)` builds each worker's private sink
    ///
    /// All sinks are created up front so a creation failure aborts the run
    /// before any worker starts.
    pub fn write<W, F>(&self, ranges: &[Range], mut make_sink: F) -> Result<AggregateResult>
    where
        W: Write + Send,
        F: FnMut(usize) -> Result<W>,
    {
        let sinks = ranges
            .iter()
            .enumerate()
            .map(|(i, _)| make_sink(i).map(Some))
            .collect::<Result<Vec<_>>>()
            .context("failed to create worker sinks")?;
        self.run(ranges, sinks)
    }

    fn run<W: Write + Send>(
        &self,
        ranges: &[Range],
        sinks: Vec<Option<W>>,
    ) -> Result<AggregateResult> {
        debug_assert_eq!(ranges.len(), sinks.len());
        if ranges.is_empty() {
            return Ok(AggregateResult {
                total: 0,
                write_errors: 0,
                wall_clock: Duration::ZERO,
                max_worker_elapsed: Duration::ZERO,
                workers: Vec::new(),
            });
        }

        // single partition, no monitor: run inline without any
        // coordination overhead
        if ranges.len() == 1 && self.progress_interval.is_none() {
            return self.run_single(ranges[0], sinks.into_iter().next().flatten());
        }

        self.run_parallel(ranges, sinks)
    }

    fn run_single<W: Write + Send>(&self, range: Range, sink: Option<W>) -> Result<AggregateResult> {
        let started = Instant::now();
        let live = AtomicU64::new(0);
        let report = self.worker(0, range, sink, &live)?;
        let wall_clock = started.elapsed();
        Ok(AggregateResult {
            total: report.produced,
            write_errors: report.write_errors,
            wall_clock,
            max_worker_elapsed: report.elapsed,
            workers: vec![report],
        })
    }

    fn run_parallel<W: Write + Send>(
        &self,
        ranges: &[Range],
        sinks: Vec<Option<W>>,
    ) -> Result<AggregateResult> {
        let forks = ranges.len();
        let (result_tx, result_rx) = bounded::<Result<WorkerResult, Cancelled>>(forks);
        let live: Vec<AtomicU64> = (0..forks).map(|_| AtomicU64::new(0)).collect();
        let monitor_done = AtomicBool::new(false);

        let monitor = self.progress_interval.map(|interval| {
            let expected = ranges
                .iter()
                .map(|&range| {
                    Enumerator::with_range(self.alphabet, self.length, range, self.strategy)
                        .expected()
                })
                .collect();
            ProgressMonitor::new(expected, interval)
        });

        let started = Instant::now();
        let reports = crossbeam::thread::scope(|s| {
            for (worker_id, (&range, sink)) in ranges.iter().zip(sinks).enumerate() {
                let result_tx = result_tx.clone();
                let live = &live[worker_id];
                s.spawn(move |_| {
                    let report = self.worker(worker_id, range, sink, live);
                    // receiver outlives every worker; a send can only fail
                    // if the coordinator already gave up on the run
                    let _ = result_tx.send(report);
                });
            }
            drop(result_tx);

            if let Some(monitor) = &monitor {
                s.spawn(|_| monitor.run(&live, &self.controller, &monitor_done));
            }

            // block until every worker has reported
            let mut reports = Vec::with_capacity(forks);
            for _ in 0..forks {
                match result_rx.recv() {
                    Ok(report) => reports.push(report),
                    Err(_) => break,
                }
            }
            monitor_done.store(true, Ordering::Relaxed);
            reports
        })
        .map_err(|_| anyhow::anyhow!("worker thread panicked during generation"))?;

        let wall_clock = started.elapsed();
        if let Some(monitor) = &monitor {
            monitor.finish();
        }

        if reports.len() != forks {
            anyhow::bail!("worker result channel closed early ({}/{forks})", reports.len());
        }

        let mut workers = reports
            .into_iter()
            .collect::<Result<Vec<_>, Cancelled>>()
            .context("generation interrupted")?;
        workers.sort_by_key(|w| w.worker_id);

        Ok(AggregateResult {
            total: workers.iter().map(|w| w.produced).sum(),
            write_errors: workers.iter().map(|w| w.write_errors).sum(),
            wall_clock,
            max_worker_elapsed: workers
                .iter()
                .map(|w| w.elapsed)
                .max()
                .unwrap_or(Duration::ZERO),
            workers,
        })
    }

    /// One worker's full lifetime: build its enumerator and context, run,
    /// report
    fn worker<W: Write + Send>(
        &self,
        worker_id: usize,
        range: Range,
        sink: Option<W>,
        live: &AtomicU64,
    ) -> Result<WorkerResult, Cancelled> {
        let enumerator = Enumerator::with_range(self.alphabet, self.length, range, self.strategy);
        let mut ctx = WorkerContext::new(&self.controller, live);
        tracing::info!(
            worker = worker_id,
            left = range.left,
            right = range.right,
            "starting worker"
        );

        let stats = match sink {
            Some(mut sink) => enumerator.emit(&mut sink, &mut ctx)?,
            None => enumerator.count(&mut ctx)?,
        };

        let elapsed = ctx.clock.elapsed();
        tracing::info!(
            worker = worker_id,
            produced = stats.produced as u64,
            secs = elapsed.as_secs_f64(),
            "worker finished"
        );
        Ok(WorkerResult {
            worker_id,
            range,
            produced: stats.produced,
            write_errors: stats.write_errors,
            elapsed,
        })
    }
}
