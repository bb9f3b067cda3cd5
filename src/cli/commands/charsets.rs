//! `pwgen charsets` - list the built-in character sets

use anyhow::Result;

use crate::alphabet::Alphabet;
use crate::cli::Output;

pub fn execute(_output: &Output) -> Result<()> {
    for (name, alphabet) in [("full", Alphabet::full()), ("short", Alphabet::short())] {
        println!("{name:6} ({:2} symbols): {alphabet}", alphabet.len());
    }
    println!();
    println!("A custom set can be loaded with --charset-file (one symbol per line).");
    Ok(())
}
