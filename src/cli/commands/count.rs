//! `pwgen count` - enumerate and count without writing

use anyhow::Result;
use clap::Args;

use super::{GenArgs, load_config, print_summary};
use crate::cli::{Output, OutputFormat};

#[derive(Args)]
pub struct CountArgs {
    #[command(flatten)]
    pub common: GenArgs,
}

pub async fn execute(
    args: CountArgs,
    config_path: Option<&str>,
    format: OutputFormat,
    output: &Output,
) -> Result<()> {
    let config = load_config(config_path)?;
    let plan = args.common.resolve(&config)?;

    output.verbose(&format!(
        "counting length-{} sequences over {} symbols with {} workers",
        plan.length,
        plan.alphabet.len(),
        plan.workers
    ));

    let ranges = plan.ranges();
    let (coordinator, _controller) = plan.coordinator();
    let result = coordinator.count(&ranges)?;

    print_summary(&result, format, output)?;
    Ok(())
}
