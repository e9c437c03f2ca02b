use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::CheckArgs;
use crate::loader::load_report_bytes;
use crate::metrics::ReportMetrics;
use crate::util::sha256_hex;

pub fn run(args: CheckArgs) -> Result<()> {
    let raw = fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let report = load_report_bytes(&raw)
        .with_context(|| format!("failed to load validation report {}", args.file.display()))?;
    let metrics = ReportMetrics::compute(&report);

    info!(
        path = %args.file.display(),
        sha256 = %sha256_hex(&raw),
        size_bytes = raw.len(),
        result_type = %report.result_type,
        qa_results = metrics.total_facts,
        embedding_results = metrics.total_embeddings,
        exact_missing = report.exact_missing.len(),
        fuzzy_missing = report.fuzzy_missing.len(),
        issues = metrics.total_issues,
        "validation report accepted"
    );

    Ok(())
}
