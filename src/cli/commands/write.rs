//! `pwgen write` - enumerate and write sequences to per-worker files

use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use super::{GenArgs, load_config, print_summary};
use crate::cli::{Output, OutputFormat};

#[derive(Args)]
pub struct WriteArgs {
    #[command(flatten)]
    pub common: GenArgs,

    /// Destination file, or prefix for per-worker files
    ///
    /// A single-worker run writes to the path as given; a run with N > 1
    /// workers writes each worker's partition to `<OUTPUT>-01` ..
    /// `<OUTPUT>-NN`.
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: PathBuf,
}

/// Per-worker sink path: the bare destination for a single worker,
/// `-NN`-suffixed (1-based) otherwise
fn sink_path(base: &PathBuf, worker_id: usize, forks: usize) -> PathBuf {
    if forks == 1 {
        base.clone()
    } else {
        let mut name = base.as_os_str().to_os_string();
        name.push(format!("-{:02}", worker_id + 1));
        PathBuf::from(name)
    }
}

pub async fn execute(
    args: WriteArgs,
    config_path: Option<&str>,
    format: OutputFormat,
    output: &Output,
) -> Result<()> {
    let config = load_config(config_path)?;
    let plan = args.common.resolve(&config)?;

    let ranges = plan.ranges();
    let forks = ranges.len();
    output.verbose(&format!(
        "writing length-{} sequences over {} symbols to {} sink(s)",
        plan.length,
        plan.alphabet.len(),
        forks
    ));

    let (coordinator, _controller) = plan.coordinator();
    let result = coordinator.write(&ranges, |worker_id| {
        let path = sink_path(&args.output, worker_id, forks);
        let file = File::create(&path)
            .with_context(|| format!("failed to create output file {}", path.display()))?;
        Ok(BufWriter::new(file))
    })?;

    if forks == 1 {
        output.success(&format!("wrote {}", args.output.display()));
    } else {
        output.success(&format!(
            "wrote {}-01 .. {}-{:02}",
            args.output.display(),
            args.output.display(),
            forks
        ));
    }
    print_summary(&result, format, output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_worker_uses_bare_path() {
        let base = PathBuf::from("words.txt");
        assert_eq!(sink_path(&base, 0, 1), PathBuf::from("words.txt"));
    }

    #[test]
    fn multi_worker_paths_are_numbered_from_one() {
        let base = PathBuf::from("words");
        assert_eq!(sink_path(&base, 0, 4), PathBuf::from("words-01"));
        assert_eq!(sink_path(&base, 3, 4), PathBuf::from("words-04"));
    }
}
