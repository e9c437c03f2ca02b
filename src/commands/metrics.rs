use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::cli::MetricsArgs;
use crate::loader::load_report_path;
use crate::metrics::{ReportMetrics, format_optional_percent, format_percent};

pub fn run(args: MetricsArgs) -> Result<()> {
    let report = load_report_path(&args.file)?;
    let metrics = ReportMetrics::compute(&report);

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &metrics)
            .context("failed to serialize metrics json output")?;
        writeln!(output)?;
    } else {
        write_text_metrics(&mut output, &metrics)?;
    }
    output.flush()?;
    Ok(())
}

fn write_text_metrics<W: Write>(output: &mut W, metrics: &ReportMetrics) -> Result<()> {
    writeln!(output, "Result type: {}", metrics.result_type)?;
    writeln!(
        output,
        "summac_score={} band={}",
        format_percent(metrics.summac_score),
        metrics.summac_band
    )?;
    writeln!(
        output,
        "supported={}/{} present={}/{} issues={} (timeline={} media_type={})",
        metrics.supported_count,
        metrics.total_facts,
        metrics.present_count,
        metrics.total_embeddings,
        metrics.total_issues,
        metrics.timeline_issue_count,
        metrics.media_type_issue_count,
    )?;
    writeln!(
        output,
        "avg_qa_score={} avg_embedding_score={}",
        format_optional_percent(metrics.avg_qa_score),
        format_optional_percent(metrics.avg_embedding_score),
    )?;
    writeln!(
        output,
        "dominant_intent={} source={}",
        format_percent(metrics.dominant_intent.score),
        metrics.dominant_intent.source
    )?;
    Ok(())
}
