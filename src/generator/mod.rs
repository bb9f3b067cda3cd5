//! Sequence enumeration engine
//!
//! Visits every length-L string over an alphabet (optionally restricted to a
//! first-symbol sub-range) in lexicographic order, exactly once each, either
//! counting only or also emitting each sequence to a sink. Two strategies
//! share one skeleton differing only in control flow: a depth-first
//! recursive walk and an iterative odometer loop that avoids recursion
//! overhead. Both produce identical output in identical order.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::alphabet::Alphabet;
use crate::control::{Cancelled, RunController, WorkerClock};
use crate::partition::Range;

mod iterative;
mod recursive;

/// Sequences between two controller checkpoints / live-counter flushes
const CHECKPOINT_MASK: u128 = (1 << 16) - 1;

/// Enumeration strategy
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Depth-first recursion over sequence positions
    Recursive,
    /// Odometer loop incrementing the rightmost position with carry
    #[default]
    Iterative,
}

/// Counters produced by one enumeration run
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    /// Sequences generated (exact)
    pub produced: u128,
    /// Sink writes that failed and were skipped (best-effort policy)
    pub write_errors: u64,
}

/// Per-worker context threaded through the enumeration call chain
///
/// Owns the worker's compute clock and borrows the shared controller plus
/// the live counter the progress monitor samples. No state outside this
/// context survives the worker.
pub struct WorkerContext<'a> {
    pub controller: &'a RunController,
    pub clock: WorkerClock,
    pub live: &'a AtomicU64,
}

impl<'a> WorkerContext<'a> {
    pub fn new(controller: &'a RunController, live: &'a AtomicU64) -> Self {
        Self {
            controller,
            clock: WorkerClock::start(),
            live,
        }
    }
}

/// Exhaustive enumerator over one first-symbol range
///
/// The sequence buffer is overwritten in place as enumeration proceeds;
/// at the moment position `p` is settled, positions `0..p` hold the prefix
/// currently being extended.
pub struct Enumerator<'a> {
    alphabet: &'a Alphabet,
    length: usize,
    range: Range,
    strategy: Strategy,
}

/// Mutable run state shared by both strategies
pub(crate) struct Frame<'f, 'c, W: Write> {
    pub(crate) word: Vec<u8>,
    pub(crate) stats: RunStats,
    pub(crate) sink: Option<&'f mut W>,
    pub(crate) ctx: &'f mut WorkerContext<'c>,
}

impl<W: Write> Frame<'_, '_, W> {
    /// Leaf action: count the settled sequence and, in emit mode, write it
    /// followed by a newline. Checkpoints every `CHECKPOINT_MASK + 1`
    /// sequences: flushes the live counter and polls the controller.
    #[inline]
    fn emit(&mut self) -> Result<(), Cancelled> {
        self.stats.produced += 1;
        if let Some(sink) = self.sink.as_mut() {
            let res = sink
                .write_all(&self.word)
                .and_then(|()| sink.write_all(b"\n"));
            if let Err(e) = res {
                // best-effort: log once, keep enumerating
                if self.stats.write_errors == 0 {
                    tracing::warn!("sink write failed, continuing: {e}");
                }
                self.stats.write_errors += 1;
            }
        }
        if (self.stats.produced & CHECKPOINT_MASK) == 0 {
            self.flush_live();
            self.ctx.controller.checkpoint(&mut self.ctx.clock)?;
        }
        Ok(())
    }

    fn flush_live(&self) {
        let snapshot = u64::try_from(self.stats.produced).unwrap_or(u64::MAX);
        self.ctx.live.store(snapshot, Ordering::Relaxed);
    }
}

impl<'a> Enumerator<'a> {
    /// Enumerator over the full first-symbol domain
    pub fn new(alphabet: &'a Alphabet, length: usize, strategy: Strategy) -> Self {
        Self::with_range(alphabet, length, Range::full(alphabet.len()), strategy)
    }

    /// Enumerator restricted to first symbols in `range`
    pub fn with_range(
        alphabet: &'a Alphabet,
        length: usize,
        range: Range,
        strategy: Strategy,
    ) -> Self {
        debug_assert!(range.right <= alphabet.len());
        Self {
            alphabet,
            length,
            range,
            strategy,
        }
    }

    pub fn range(&self) -> Range {
        self.range
    }

    /// Exact number of sequences this enumerator will produce,
    /// `(right - left) * N^(L-1)`, or `None` if it exceeds `u128`
    pub fn expected(&self) -> Option<u128> {
        if self.length == 0 {
            return Some(1);
        }
        let n = self.alphabet.len() as u128;
        n.checked_pow((self.length - 1) as u32)?
            .checked_mul(self.range.len() as u128)
    }

    /// Count-only run
    pub fn count(&self, ctx: &mut WorkerContext<'_>) -> Result<RunStats, Cancelled> {
        self.run::<std::io::Sink>(None, ctx)
    }

    /// Count-and-emit run; each sequence plus a newline goes to `sink`
    pub fn emit<W: Write>(
        &self,
        sink: &mut W,
        ctx: &mut WorkerContext<'_>,
    ) -> Result<RunStats, Cancelled> {
        self.run(Some(sink), ctx)
    }

    fn run<W: Write>(
        &self,
        sink: Option<&mut W>,
        ctx: &mut WorkerContext<'_>,
    ) -> Result<RunStats, Cancelled> {
        let mut frame = Frame {
            word: vec![0u8; self.length],
            stats: RunStats::default(),
            sink,
            ctx,
        };

        if self.length == 0 {
            // degenerate case: exactly one empty sequence
            frame.emit()?;
        } else if !self.alphabet.is_empty() && !self.range.is_empty() {
            match self.strategy {
                Strategy::Recursive => self.run_recursive(&mut frame)?,
                Strategy::Iterative => self.run_iterative(&mut frame)?,
            }
        }

        frame.flush_live();
        if let Some(sink) = frame.sink.as_mut() {
            if let Err(e) = sink.flush() {
                tracing::warn!("sink flush failed: {e}");
                frame.stats.write_errors += 1;
            }
        }
        Ok(frame.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn collect(
        alphabet: &Alphabet,
        length: usize,
        range: Range,
        strategy: Strategy,
    ) -> (Vec<String>, RunStats) {
        let controller = RunController::new();
        let live = AtomicU64::new(0);
        let mut ctx = WorkerContext::new(&controller, &live);
        let mut sink = Vec::new();
        let enumerator = Enumerator::with_range(alphabet, length, range, strategy);
        let stats = enumerator.emit(&mut sink, &mut ctx).unwrap();
        let lines = String::from_utf8(sink)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        (lines, stats)
    }

    #[test]
    fn two_symbols_length_two() {
        let alphabet = Alphabet::from_symbols(b"ab".to_vec()).unwrap();
        let (lines, stats) = collect(&alphabet, 2, Range::full(2), Strategy::Iterative);
        assert_eq!(lines, vec!["aa", "ab", "ba", "bb"]);
        assert_eq!(stats.produced, 4);
    }

    #[test]
    fn count_matches_n_pow_l() {
        let alphabet = Alphabet::from_symbols(b"abc".to_vec()).unwrap();
        let controller = RunController::new();
        let live = AtomicU64::new(0);
        let mut ctx = WorkerContext::new(&controller, &live);
        let stats = Enumerator::new(&alphabet, 4, Strategy::Iterative)
            .count(&mut ctx)
            .unwrap();
        assert_eq!(stats.produced, 81);
    }

    #[test]
    fn first_symbol_range_restricts_subtree() {
        let alphabet = Alphabet::from_symbols(b"abc".to_vec()).unwrap();
        let (lines, stats) = collect(&alphabet, 3, Range::new(1, 2), Strategy::Recursive);
        assert_eq!(stats.produced, 9);
        assert!(lines.iter().all(|s| s.starts_with('b')));
        assert_eq!(lines.first().unwrap(), "baa");
        assert_eq!(lines.last().unwrap(), "bcc");
    }

    #[test]
    fn strategies_are_equivalent() {
        let alphabet = Alphabet::from_symbols(b"xyz0".to_vec()).unwrap();
        for length in [1, 2, 3, 4] {
            for (left, right) in [(0, 4), (0, 1), (1, 3), (2, 2), (3, 4)] {
                let range = Range::new(left, right);
                let (rec, rec_stats) = collect(&alphabet, length, range, Strategy::Recursive);
                let (odo, odo_stats) = collect(&alphabet, length, range, Strategy::Iterative);
                assert_eq!(rec, odo, "length {length}, range [{left}, {right})");
                assert_eq!(rec_stats.produced, odo_stats.produced);
            }
        }
    }

    #[test]
    fn output_is_sorted_and_unique() {
        let alphabet = Alphabet::from_symbols(b"badc".to_vec()).unwrap();
        // symbol order of the alphabet, not ASCII order, drives the output
        let (lines, _) = collect(&alphabet, 2, Range::full(4), Strategy::Iterative);
        assert_eq!(lines.len(), 16);
        assert_eq!(lines.first().unwrap(), "bb");
        assert_eq!(lines.last().unwrap(), "cc");
        let mut dedup = lines.clone();
        dedup.dedup();
        assert_eq!(dedup.len(), lines.len());
    }

    #[test]
    fn empty_range_yields_nothing() {
        let alphabet = Alphabet::from_symbols(b"ab".to_vec()).unwrap();
        let (lines, stats) = collect(&alphabet, 3, Range::new(1, 1), Strategy::Iterative);
        assert!(lines.is_empty());
        assert_eq!(stats.produced, 0);
    }

    #[test]
    fn zero_length_yields_one_empty_sequence() {
        let alphabet = Alphabet::from_symbols(b"ab".to_vec()).unwrap();
        for strategy in [Strategy::Recursive, Strategy::Iterative] {
            let (lines, stats) = collect(&alphabet, 0, Range::full(2), strategy);
            assert_eq!(stats.produced, 1);
            assert_eq!(lines, vec![""]);
        }
    }

    #[test]
    fn expected_counts() {
        let alphabet = Alphabet::from_symbols(b"abc".to_vec()).unwrap();
        let e = Enumerator::with_range(&alphabet, 3, Range::new(0, 2), Strategy::Iterative);
        assert_eq!(e.expected(), Some(18));
        let full = Alphabet::full();
        let e = Enumerator::new(&full, 10, Strategy::Iterative);
        // 88^10 comfortably fits in u128
        assert_eq!(e.expected(), Some(88u128.pow(10)));
    }

    /// Sink that fails every write
    struct BrokenSink;

    impl io::Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_do_not_abort_enumeration() {
        let alphabet = Alphabet::from_symbols(b"ab".to_vec()).unwrap();
        let controller = RunController::new();
        let live = AtomicU64::new(0);
        let mut ctx = WorkerContext::new(&controller, &live);
        let stats = Enumerator::new(&alphabet, 3, Strategy::Iterative)
            .emit(&mut BrokenSink, &mut ctx)
            .unwrap();
        assert_eq!(stats.produced, 8);
        // one failure per sequence (word write fails first)
        assert_eq!(stats.write_errors, 8);
    }

    #[test]
    fn cancelled_run_stops_early() {
        let alphabet = Alphabet::from_symbols(b"abcd".to_vec()).unwrap();
        let controller = RunController::new();
        controller.cancel();
        let live = AtomicU64::new(0);
        let mut ctx = WorkerContext::new(&controller, &live);
        // enough sequences to cross at least one checkpoint
        let result = Enumerator::new(&alphabet, 9, Strategy::Iterative).count(&mut ctx);
        assert_eq!(result.unwrap_err(), Cancelled);
    }

    #[test]
    fn live_counter_is_flushed_at_completion() {
        let alphabet = Alphabet::from_symbols(b"ab".to_vec()).unwrap();
        let controller = RunController::new();
        let live = AtomicU64::new(0);
        let mut ctx = WorkerContext::new(&controller, &live);
        Enumerator::new(&alphabet, 4, Strategy::Recursive)
            .count(&mut ctx)
            .unwrap();
        assert_eq!(live.load(Ordering::Relaxed), 16);
    }
}
