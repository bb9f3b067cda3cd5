//! Pause/resume and cancellation control
//!
//! Replaces process-wide signal-handler globals with an explicit controller
//! shared by every worker. Workers poll [`RunController::checkpoint`] at a
//! coarse interval from inside the enumeration loop: while the run is
//! suspended they block on a condvar, and the time spent blocked is folded
//! into the worker's clock as lag so reported compute time excludes pauses.

use std::fmt;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

mod signals;

pub use signals::spawn_signal_watcher;

/// Lifecycle states of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Suspended,
    Terminating,
}

/// Error returned from a checkpoint once the run has been cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run cancelled by interrupt")
    }
}

impl std::error::Error for Cancelled {}

/// Shared pause/resume/cancel controller
///
/// One instance per run, shared between the coordinator, every worker, and
/// the signal watcher. State transitions are `Running -> Suspended`
/// (pause), `Suspended -> Running` (resume) and any state ->
/// `Terminating` (cancel, terminal).
pub struct RunController {
    state: Mutex<RunState>,
    cond: Condvar,
}

impl Default for RunController {
    fn default() -> Self {
        Self::new()
    }
}

impl RunController {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RunState::Running),
            cond: Condvar::new(),
        }
    }

    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap()
    }

    /// Suspend all workers at their next checkpoint
    pub fn pause(&self) {
        let mut state = self.state.lock().unwrap();
        if *state == RunState::Running {
            *state = RunState::Suspended;
            tracing::info!("run suspended");
        }
    }

    /// Wake all suspended workers
    pub fn resume(&self) {
        let mut state = self.state.lock().unwrap();
        if *state == RunState::Suspended {
            *state = RunState::Running;
            tracing::info!("run resumed");
            self.cond.notify_all();
        }
    }

    /// Cancel the run; terminal, wakes suspended workers so they can exit
    pub fn cancel(&self) {
        let mut state = self.state.lock().unwrap();
        if *state != RunState::Terminating {
            *state = RunState::Terminating;
            tracing::warn!("run terminating on interrupt");
            self.cond.notify_all();
        }
    }

    /// Worker-side poll point
    ///
    /// Returns immediately while running. While suspended, blocks on the
    /// condvar and accumulates the blocked interval into `clock` as lag.
    /// Returns `Err(Cancelled)` once the run is terminating.
    pub fn checkpoint(&self, clock: &mut WorkerClock) -> Result<(), Cancelled> {
        let mut state = self.state.lock().unwrap();
        match *state {
            RunState::Running => Ok(()),
            RunState::Terminating => Err(Cancelled),
            RunState::Suspended => {
                let pause_started = Instant::now();
                while *state == RunState::Suspended {
                    state = self.cond.wait(state).unwrap();
                }
                clock.add_lag(pause_started.elapsed());
                match *state {
                    RunState::Terminating => Err(Cancelled),
                    _ => Ok(()),
                }
            }
        }
    }
}

/// Per-worker compute clock
///
/// Tracks wall-clock time since the worker started minus the cumulative
/// lag spent suspended, so throughput figures are not skewed by pauses.
#[derive(Debug, Clone)]
pub struct WorkerClock {
    started: Instant,
    lag: Duration,
}

impl WorkerClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            lag: Duration::ZERO,
        }
    }

    pub fn add_lag(&mut self, lag: Duration) {
        self.lag += lag;
    }

    /// Elapsed compute time, excluding suspended intervals
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed().saturating_sub(self.lag)
    }

    /// Total suspended time accumulated so far
    pub fn lag(&self) -> Duration {
        self.lag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn checkpoint_passes_while_running() {
        let controller = RunController::new();
        let mut clock = WorkerClock::start();
        assert!(controller.checkpoint(&mut clock).is_ok());
        assert_eq!(clock.lag(), Duration::ZERO);
    }

    #[test]
    fn checkpoint_fails_after_cancel() {
        let controller = RunController::new();
        controller.cancel();
        let mut clock = WorkerClock::start();
        assert_eq!(controller.checkpoint(&mut clock), Err(Cancelled));
    }

    #[test]
    fn resume_only_applies_when_suspended() {
        let controller = RunController::new();
        controller.resume();
        assert_eq!(controller.state(), RunState::Running);
        controller.cancel();
        controller.resume();
        assert_eq!(controller.state(), RunState::Terminating);
    }

    #[test]
    fn suspended_checkpoint_accumulates_lag() {
        let controller = Arc::new(RunController::new());
        controller.pause();

        let worker = {
            let controller = controller.clone();
            thread::spawn(move || {
                let mut clock = WorkerClock::start();
                controller.checkpoint(&mut clock).unwrap();
                clock.lag()
            })
        };

        thread::sleep(Duration::from_millis(50));
        controller.resume();
        let lag = worker.join().unwrap();
        assert!(lag >= Duration::from_millis(30));
    }

    #[test]
    fn cancel_wakes_suspended_worker() {
        let controller = Arc::new(RunController::new());
        controller.pause();

        let worker = {
            let controller = controller.clone();
            thread::spawn(move || {
                let mut clock = WorkerClock::start();
                controller.checkpoint(&mut clock)
            })
        };

        thread::sleep(Duration::from_millis(20));
        controller.cancel();
        assert_eq!(worker.join().unwrap(), Err(Cancelled));
    }

    #[test]
    fn clock_excludes_lag() {
        let mut clock = WorkerClock::start();
        thread::sleep(Duration::from_millis(20));
        clock.add_lag(Duration::from_millis(15));
        assert!(clock.elapsed() < clock.started.elapsed());
    }
}
