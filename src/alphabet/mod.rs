//! Symbol alphabets sequences are built from
//!
//! An alphabet is an ordered, immutable table of byte symbols. The symbol
//! order induces the lexicographic order of the generated sequences.
//! Duplicate symbols are allowed and simply produce duplicate sequences.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Short built-in set: a-z, A-Z, 0-9 (62 symbols)
const SHORT_SET: &[u8] = b"abcdefghijklmnopqrstuvwxyz\
ABCDEFGHIJKLMNOPQRSTUVWXYZ\
0123456789";

/// Full built-in set: the short set plus printable punctuation and the
/// space character (88 symbols)
const FULL_SET: &[u8] = b"abcdefghijklmnopqrstuvwxyz\
ABCDEFGHIJKLMNOPQRSTUVWXYZ\
0123456789\
!?\"$%&/()=^<>+*-,;.:@#[]| ";

/// Built-in charset selector
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CharsetKind {
    /// Letters, digits, punctuation and space (88 symbols)
    #[default]
    Full,
    /// Letters and digits only (62 symbols)
    Short,
}

impl CharsetKind {
    pub fn alphabet(self) -> Alphabet {
        match self {
            CharsetKind::Full => Alphabet::full(),
            CharsetKind::Short => Alphabet::short(),
        }
    }
}

/// Ordered, immutable set of symbols used to build sequences
///
/// Constructed once before generation starts and shared read-only across
/// all workers; no mutation ever occurs after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
}

impl Alphabet {
    /// Build an alphabet from raw symbols, preserving order
    pub fn from_symbols(symbols: Vec<u8>) -> Result<Self> {
        if symbols.is_empty() {
            bail!("alphabet must contain at least one symbol");
        }
        Ok(Self { symbols })
    }

    /// Full built-in set (letters, digits, punctuation, space)
    pub fn full() -> Self {
        Self {
            symbols: FULL_SET.to_vec(),
        }
    }

    /// Short built-in set (letters and digits only)
    pub fn short() -> Self {
        Self {
            symbols: SHORT_SET.to_vec(),
        }
    }

    /// Load a custom alphabet from a file, one symbol per line
    ///
    /// The first byte of every non-empty line is taken as a symbol, in file
    /// order. Blank lines are skipped.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read alphabet file {}", path.display()))?;

        let symbols: Vec<u8> = contents
            .lines()
            .filter_map(|line| line.as_bytes().first().copied())
            .collect();

        if symbols.is_empty() {
            bail!("alphabet file {} contains no symbols", path.display());
        }
        Ok(Self { symbols })
    }

    /// Number of symbols in the alphabet
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol at index `i`; panics if out of bounds
    #[inline]
    pub fn symbol(&self, i: usize) -> u8 {
        self.symbols[i]
    }

    /// The full symbol table in order
    pub fn as_bytes(&self) -> &[u8] {
        &self.symbols
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.symbols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_set_sizes() {
        assert_eq!(Alphabet::short().len(), 62);
        assert_eq!(Alphabet::full().len(), 88);
    }

    #[test]
    fn full_set_extends_short_set() {
        let full = Alphabet::full();
        let short = Alphabet::short();
        assert_eq!(&full.as_bytes()[..short.len()], short.as_bytes());
    }

    #[test]
    fn empty_alphabet_rejected() {
        assert!(Alphabet::from_symbols(Vec::new()).is_err());
    }

    #[test]
    fn from_file_one_symbol_per_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a").unwrap();
        writeln!(file, "b").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "c").unwrap();

        let alphabet = Alphabet::from_file(file.path()).unwrap();
        assert_eq!(alphabet.as_bytes(), b"abc");
    }

    #[test]
    fn from_file_empty_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(Alphabet::from_file(file.path()).is_err());
    }

    #[test]
    fn duplicates_are_preserved() {
        let alphabet = Alphabet::from_symbols(b"aab".to_vec()).unwrap();
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.symbol(0), alphabet.symbol(1));
    }
}
