//! Per-worker progress reporting
//!
//! A sampler loop periodically snapshots each worker's live sequence
//! counter and renders one indicatif bar per worker on a percentage scale,
//! with instantaneous throughput (over the last interval, not a cumulative
//! average) and an ETA. Sampling is strictly read-only and tolerates
//! concurrent increments; an eventually-consistent snapshot is fine since
//! this is informational output.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::control::{RunController, RunState};

/// Completion estimate above which a worker's bar stops updating; the tail
/// of an unevenly distributed run is hard to estimate precisely
const HIGH_WATER_PERCENT: f64 = 90.0;

/// Granularity of the done-flag poll between samples
const POLL_SLICE: Duration = Duration::from_millis(200);

/// Read-only monitor over the workers' live counters
pub struct ProgressMonitor {
    multi: MultiProgress,
    bars: Vec<ProgressBar>,
    /// Expected sequences per worker, `None` when beyond u128
    expected: Vec<Option<u128>>,
    interval: Duration,
}

impl ProgressMonitor {
    pub fn new(expected: Vec<Option<u128>>, interval: Duration) -> Self {
        let multi = MultiProgress::new();
        let style = ProgressStyle::with_template(
            "[worker {prefix}] {bar:40.cyan/blue} {pos:>3}% {msg}",
        )
        .unwrap();

        let bars = (0..expected.len())
            .map(|worker_id| {
                let bar = multi.add(ProgressBar::new(100));
                bar.set_style(style.clone());
                bar.set_prefix(format!("{worker_id:2}"));
                bar
            })
            .collect();

        Self {
            multi,
            bars,
            expected,
            interval,
        }
    }

    /// Sampler loop; returns once `done` is set
    pub fn run(&self, live: &[AtomicU64], controller: &RunController, done: &AtomicBool) {
        let mut last_counts = vec![0u64; self.bars.len()];
        let mut last_tick = Instant::now();

        while !self.sleep_interval(done) {
            if controller.state() == RunState::Suspended {
                for bar in &self.bars {
                    if !bar.is_finished() {
                        bar.set_message("paused");
                    }
                }
                // the interval spent suspended must not count as progress time
                last_tick = Instant::now();
                continue;
            }

            let now = Instant::now();
            let dt = now.duration_since(last_tick).as_secs_f64();
            for (worker_id, bar) in self.bars.iter().enumerate() {
                if bar.is_finished() {
                    continue;
                }
                let count = live[worker_id].load(Ordering::Relaxed);
                let rate = if dt > 0.0 {
                    count.saturating_sub(last_counts[worker_id]) as f64 / dt
                } else {
                    0.0
                };
                last_counts[worker_id] = count;
                self.render(worker_id, bar, count, rate);
            }
            last_tick = now;
        }
    }

    fn render(&self, worker_id: usize, bar: &ProgressBar, count: u64, rate: f64) {
        match self.expected[worker_id] {
            Some(expected) if expected > 0 => {
                let percent = (count as f64 / expected as f64 * 100.0).min(100.0);
                bar.set_position(percent as u64);
                if percent >= HIGH_WATER_PERCENT {
                    bar.finish_with_message(format!("{count} seqs, ~{percent:.0}%"));
                    return;
                }
                let eta = if rate > 0.0 {
                    let remaining = expected.saturating_sub(count as u128) as f64;
                    format!("{:.0}s", remaining / rate)
                } else {
                    "--".to_string()
                };
                bar.set_message(format!("{count} seqs | {rate:.0} seq/s | ETA {eta}"));
            }
            // expected count unknown: no percentage or ETA, just counters
            _ => bar.set_message(format!("{count} seqs | {rate:.0} seq/s")),
        }
    }

    /// Sleep one sample interval in short slices; true once `done` is set
    fn sleep_interval(&self, done: &AtomicBool) -> bool {
        let deadline = Instant::now() + self.interval;
        while Instant::now() < deadline {
            if done.load(Ordering::Relaxed) {
                return true;
            }
            std::thread::sleep(POLL_SLICE.min(deadline - Instant::now()));
        }
        done.load(Ordering::Relaxed)
    }

    /// Finish all bars and clear the display
    pub fn finish(&self) {
        for bar in &self.bars {
            if !bar.is_finished() {
                bar.finish();
            }
        }
        let _ = self.multi.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monitor_exits_when_done() {
        let monitor = ProgressMonitor::new(vec![Some(100), Some(100)], Duration::from_secs(20));
        let live = [AtomicU64::new(0), AtomicU64::new(0)];
        let controller = RunController::new();
        let done = AtomicBool::new(true);
        monitor.run(&live, &controller, &done);
        monitor.finish();
    }

    #[test]
    fn bar_finishes_at_high_water_mark() {
        let monitor = ProgressMonitor::new(vec![Some(100)], Duration::from_millis(1));
        monitor.render(0, &monitor.bars[0], 95, 10.0);
        assert!(monitor.bars[0].is_finished());
    }

    #[test]
    fn unknown_expected_count_still_reports() {
        let monitor = ProgressMonitor::new(vec![None], Duration::from_millis(1));
        monitor.render(0, &monitor.bars[0], 42, 7.0);
        assert!(!monitor.bars[0].is_finished());
    }
}
