use anyhow::Result;
use tracing::info;

use crate::cli::SampleArgs;
use crate::util::write_output;

pub const SAMPLE_REPORT: &str = include_str!("../../assets/sample-validation-report.json");

pub fn run(args: SampleArgs) -> Result<()> {
    write_output(Some(&args.output), SAMPLE_REPORT)?;
    info!(path = %args.output.display(), "wrote sample validation report");
    Ok(())
}
