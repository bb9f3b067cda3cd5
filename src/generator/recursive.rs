//! Depth-first recursive enumeration

use std::io::Write;

use super::{Enumerator, Frame};
use crate::control::Cancelled;

impl Enumerator<'_> {
    pub(super) fn run_recursive<W: Write>(
        &self,
        frame: &mut Frame<'_, '_, W>,
    ) -> Result<(), Cancelled> {
        self.recurse(frame, 0)
    }

    /// Recurse over positions `0..L`; position 0 iterates only over the
    /// assigned `[left, right)` sub-range, all others over the full
    /// alphabet. Depth L is the leaf action.
    fn recurse<W: Write>(&self, frame: &mut Frame<'_, '_, W>, pos: usize) -> Result<(), Cancelled> {
        if pos == self.length {
            return frame.emit();
        }
        let (lo, hi) = if pos == 0 {
            (self.range.left, self.range.right)
        } else {
            (0, self.alphabet.len())
        };
        for i in lo..hi {
            frame.word[pos] = self.alphabet.symbol(i);
            self.recurse(frame, pos + 1)?;
        }
        Ok(())
    }
}
