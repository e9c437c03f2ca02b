use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::cli::ExportArgs;
use crate::export::write_export;
use crate::loader::load_report_path;

pub fn run(args: ExportArgs) -> Result<()> {
    let report = load_report_path(&args.file)?;
    let path = write_export(&report, &args.out_dir, Utc::now())?;

    info!(
        source = %args.file.display(),
        path = %path.display(),
        result_type = %report.result_type,
        "wrote exported report"
    );
    Ok(())
}
