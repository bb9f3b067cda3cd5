//! Iterative odometer enumeration
//!
//! Keeps a per-position digit counter and increments the rightmost position
//! for every sequence, carrying into the position to the left on overflow,
//! like a mechanical counter. Exists purely as a performance optimization
//! over the recursive walk; the unit tests in the parent module prove the
//! two orderings identical.

use std::io::Write;

use super::{Enumerator, Frame};
use crate::control::Cancelled;

impl Enumerator<'_> {
    /// Caller guarantees `length >= 1`, a non-empty alphabet and a
    /// non-empty range.
    pub(super) fn run_iterative<W: Write>(
        &self,
        frame: &mut Frame<'_, '_, W>,
    ) -> Result<(), Cancelled> {
        let n = self.alphabet.len();
        let last = self.length - 1;

        // digit counters; position 0 starts at the range's left edge
        let mut digits = vec![0usize; self.length];
        digits[0] = self.range.left;
        for (pos, &digit) in digits.iter().enumerate() {
            frame.word[pos] = self.alphabet.symbol(digit);
        }

        loop {
            frame.emit()?;

            // odometer step: bump the rightmost digit, carry left on overflow
            let mut pos = last;
            loop {
                digits[pos] += 1;
                let overflow = if pos == 0 { self.range.right } else { n };
                if digits[pos] < overflow {
                    frame.word[pos] = self.alphabet.symbol(digits[pos]);
                    break;
                }
                if pos == 0 {
                    // first position would pass right-1: enumeration complete
                    return Ok(());
                }
                digits[pos] = 0;
                frame.word[pos] = self.alphabet.symbol(0);
                pos -= 1;
            }
        }
    }
}
