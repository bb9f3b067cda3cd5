//! First-symbol work partitioning
//!
//! Splits the first-symbol index domain `[0, N)` into contiguous, disjoint
//! sub-ranges, one per worker. Uneven division is handled by appending extra
//! full-size partitions rather than padding existing ones, so no worker ever
//! covers more than `N / procs` first symbols.

/// Half-open interval `[left, right)` over alphabet indices
///
/// Constrains only the first sequence position; all other positions range
/// over the full alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub left: usize,
    pub right: usize,
}

impl Range {
    pub fn new(left: usize, right: usize) -> Self {
        debug_assert!(left <= right);
        Self { left, right }
    }

    /// The full first-symbol domain for an alphabet of size `n`
    pub fn full(n: usize) -> Self {
        Self { left: 0, right: n }
    }

    pub fn len(&self) -> usize {
        self.right - self.left
    }

    pub fn is_empty(&self) -> bool {
        self.left == self.right
    }
}

/// Plan the partitioning of `[0, n)` across `procs` requested workers
///
/// `gap = n / procs` elements per partition, with the remainder of the
/// division redistributed as additional partitions: while the remainder
/// exceeds `gap` another gap-sized partition is appended, then one final
/// partition holds whatever is left. All partitions except possibly the
/// last are exactly `gap` wide, they are produced in index order, and
/// their sizes sum to `n`.
///
/// More partitions than symbols would leave workers idle, so `procs` is
/// clamped to `[1, n]`.
pub fn partition(n: usize, procs: usize) -> Vec<Range> {
    if n == 0 {
        return Vec::new();
    }
    let procs = procs.clamp(1, n);
    let gap = n / procs;
    let mut rest = n % procs;

    let mut ranges: Vec<Range> = (0..procs)
        .map(|i| Range::new(gap * i, gap * i + gap))
        .collect();

    let mut left = gap * procs;
    while rest > gap {
        ranges.push(Range::new(left, left + gap));
        left += gap;
        rest -= gap;
    }
    if rest > 0 {
        ranges.push(Range::new(left, left + rest));
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_invariants(ranges: &[Range], n: usize) {
        // contiguous, disjoint, covering, in index order
        let mut expected_left = 0;
        for range in ranges {
            assert_eq!(range.left, expected_left);
            assert!(range.right > range.left);
            expected_left = range.right;
        }
        assert_eq!(expected_left, n);
        assert_eq!(ranges.iter().map(Range::len).sum::<usize>(), n);
    }

    #[test]
    fn even_division() {
        let ranges = partition(88, 8);
        assert_eq!(ranges.len(), 8);
        assert!(ranges.iter().all(|r| r.len() == 11));
        check_invariants(&ranges, 88);
    }

    #[test]
    fn remainder_becomes_extra_partitions() {
        // n=5, procs=3: gap=1, rest=2 > gap, so the remainder splits into
        // two more size-1 partitions for five in total
        let ranges = partition(5, 3);
        assert_eq!(ranges.len(), 5);
        assert!(ranges.iter().all(|r| r.len() == 1));
        check_invariants(&ranges, 5);
    }

    #[test]
    fn trailing_partition_at_most_gap() {
        let ranges = partition(88, 6);
        // gap=14, rest=4: six partitions of 14 plus one of 4
        assert_eq!(ranges.len(), 7);
        assert!(ranges[..6].iter().all(|r| r.len() == 14));
        assert_eq!(ranges[6].len(), 4);
        check_invariants(&ranges, 88);
    }

    #[test]
    fn single_worker_full_range() {
        let ranges = partition(62, 1);
        assert_eq!(ranges, vec![Range::full(62)]);
    }

    #[test]
    fn more_workers_than_symbols() {
        let ranges = partition(3, 16);
        assert_eq!(ranges.len(), 3);
        check_invariants(&ranges, 3);
    }

    #[test]
    fn empty_domain() {
        assert!(partition(0, 4).is_empty());
    }

    #[test]
    fn invariants_hold_across_shapes() {
        for n in 1..=96 {
            for procs in 1..=12 {
                check_invariants(&partition(n, procs), n);
            }
        }
    }
}
