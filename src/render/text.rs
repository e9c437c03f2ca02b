use std::io::Write;

use anyhow::Result;

use super::{MISSING_PLACEHOLDER, ToggleHints, ViewState, intent_row_count, value_text};
use crate::cli::ViewMode;
use crate::metrics::{ReportMetrics, ScoreBand, format_optional_percent, format_percent};
use crate::model::{MissingFact, Preserved, ValidationReport};

const BAR_WIDTH: usize = 30;

pub fn write_text<W: Write>(
    output: &mut W,
    report: &ValidationReport,
    metrics: &ReportMetrics,
    view: &ViewState,
    mode: ViewMode,
    hints: ToggleHints,
) -> Result<()> {
    match mode {
        ViewMode::Full => write_full(output, report, view),
        ViewMode::Summary => {
            write_summary(output, report, metrics, view, hints)?;
            if view.show_details {
                writeln!(output)?;
                write_full(output, report, view)?;
            }
            Ok(())
        }
    }
}

fn write_summary<W: Write>(
    output: &mut W,
    report: &ValidationReport,
    metrics: &ReportMetrics,
    view: &ViewState,
    hints: ToggleHints,
) -> Result<()> {
    writeln!(output, "Validation Summary: {}", report.result_type)?;
    writeln!(
        output,
        "  SummaC score        {}",
        score_badge(metrics.summac_score)
    )?;
    writeln!(
        output,
        "  Facts supported     {}/{}",
        metrics.supported_count, metrics.total_facts
    )?;
    writeln!(
        output,
        "  Embeddings present  {}/{}",
        metrics.present_count, metrics.total_embeddings
    )?;
    writeln!(
        output,
        "  Avg QA score        {}",
        optional_badge(metrics.avg_qa_score)
    )?;
    writeln!(
        output,
        "  Avg embedding score {}",
        optional_badge(metrics.avg_embedding_score)
    )?;
    writeln!(
        output,
        "  Issues              {} (timeline {}, media type {})",
        metrics.total_issues, metrics.timeline_issue_count, metrics.media_type_issue_count
    )?;
    writeln!(
        output,
        "  Intent score        {} via {}",
        score_badge(metrics.dominant_intent.score),
        metrics.dominant_intent.source
    )?;

    if let Some(prompt) = &report.user_prompt {
        write_optional_block(output, "User Prompt", view.show_prompt, hints.prompt, |out| {
            write_indented(out, prompt)
        })?;
    }
    if let Some(facts) = &report.sql_facts_extracted {
        write_optional_block(
            output,
            "SQL Facts Extracted",
            view.show_sql_facts,
            hints.sql_facts,
            |out| {
                for line in facts.lines() {
                    writeln!(out, "    - {line}")?;
                }
                Ok(())
            },
        )?;
    }
    if let Some(summary) = &report.llm_summary_generated {
        write_optional_block(
            output,
            "LLM Summary Generated",
            view.show_llm_summary,
            hints.llm_summary,
            |out| write_indented(out, summary),
        )?;
    }
    if !view.show_details {
        writeln!(output)?;
        writeln!(output, "  (details hidden; use {})", hints.details)?;
    }
    Ok(())
}

fn write_optional_block<W, F>(
    output: &mut W,
    title: &str,
    shown: bool,
    flag: &str,
    body: F,
) -> Result<()>
where
    W: Write,
    F: FnOnce(&mut W) -> Result<()>,
{
    writeln!(output)?;
    if shown {
        writeln!(output, "  {title}:")?;
        body(output)
    } else {
        writeln!(output, "  {title}: hidden (use {flag})")?;
        Ok(())
    }
}

fn write_full<W: Write>(output: &mut W, report: &ValidationReport, view: &ViewState) -> Result<()> {
    writeln!(output, "Validation Report")?;
    writeln!(output, "Result type: {}", report.result_type)?;
    writeln!(output)?;
    writeln!(output, "SummaC Factual Consistency Score")?;
    writeln!(
        output,
        "  {}  {}",
        score_badge(report.summac_score),
        progress_bar(report.summac_score)
    )?;

    writeln!(output)?;
    writeln!(output, "QA-based Fact Checking")?;
    if report.qa_results.is_empty() {
        writeln!(output, "  No QA results")?;
    }
    for (index, qa) in report.qa_results.iter().enumerate() {
        writeln!(output, "  {}. {}", index + 1, qa.fact)?;
        writeln!(output, "     question: {}", qa.question)?;
        writeln!(output, "     answer:   {}", qa.answer)?;
        writeln!(
            output,
            "     score:    {}  [{}]",
            score_badge(qa.score),
            if qa.supported { "Supported" } else { "Not Supported" }
        )?;
    }

    write_intent(output, report, view)?;
    write_missing(output, "Exact Missing Facts", "exact", &report.exact_missing)?;
    write_missing(output, "Fuzzy Missing Facts", "fuzzy", &report.fuzzy_missing)?;

    writeln!(output)?;
    writeln!(output, "Embedding Results")?;
    if report.embedding_results.is_empty() {
        writeln!(output, "  No embedding results")?;
    }
    for item in &report.embedding_results {
        writeln!(
            output,
            "  {}  [{}]  {}",
            score_badge(item.score),
            if item.present { "Present" } else { "Missing" },
            item.fact
        )?;
    }

    write_issues(output, "Timeline Issues", &report.timeline_issues)?;
    write_issues(output, "Media Type Issues", &report.media_type_issues)?;
    Ok(())
}

fn write_intent<W: Write>(
    output: &mut W,
    report: &ValidationReport,
    view: &ViewState,
) -> Result<()> {
    let intent = &report.intent_scores;
    writeln!(output)?;
    writeln!(output, "Intent Validation")?;

    for index in 0..intent_row_count(report) {
        let expanded = view.is_chunk_expanded(index);
        writeln!(
            output,
            "  {} Chunk {}  embedding {}  reranker {}",
            if expanded { "v" } else { ">" },
            index + 1,
            optional_badge(intent.embedding_scores.get(index).copied()),
            optional_badge(intent.reranker_scores.get(index).copied()),
        )?;
        if expanded {
            match intent.chunks.get(index) {
                Some(chunk) => write_indented_by(output, chunk, 6)?,
                None => writeln!(output, "      (no chunk text)")?,
            }
        }
    }
    writeln!(
        output,
        "  Max Embedding Score {}",
        score_badge(intent.max_embedding_score)
    )?;
    writeln!(
        output,
        "  Max Reranker Score  {}",
        score_badge(intent.max_reranker_score)
    )?;
    Ok(())
}

fn write_missing<W: Write>(
    output: &mut W,
    title: &str,
    kind: &str,
    facts: &[Preserved<MissingFact>],
) -> Result<()> {
    writeln!(output)?;
    writeln!(output, "{title}")?;
    if facts.is_empty() {
        writeln!(output, "  No {kind} missing facts found")?;
        return Ok(());
    }

    for fact in facts {
        match &**fact {
            MissingFact::Tuple {
                key,
                actual,
                expected,
            } => writeln!(
                output,
                "  {key}: actual {} expected {}",
                cell(value_text(actual.as_ref())),
                cell(value_text(expected.as_ref())),
            )?,
            MissingFact::Unknown(raw) => writeln!(output, "  (unrecognized entry) {raw}")?,
        }
    }
    Ok(())
}

fn write_issues<W: Write>(output: &mut W, title: &str, issues: &[String]) -> Result<()> {
    if issues.is_empty() {
        return Ok(());
    }
    writeln!(output)?;
    writeln!(output, "{title}")?;
    for issue in issues {
        writeln!(output, "  ! {issue}")?;
    }
    Ok(())
}

fn write_indented<W: Write>(output: &mut W, text: &str) -> Result<()> {
    write_indented_by(output, text, 4)
}

fn write_indented_by<W: Write>(output: &mut W, text: &str, width: usize) -> Result<()> {
    for line in text.lines() {
        writeln!(output, "{:width$}{line}", "")?;
    }
    Ok(())
}

fn cell(text: Option<String>) -> String {
    text.unwrap_or_else(|| format!("[{MISSING_PLACEHOLDER}]"))
}

fn score_badge(score: f64) -> String {
    format!("[{} {}]", format_percent(score), ScoreBand::from_score(score))
}

fn optional_badge(score: Option<f64>) -> String {
    match score {
        Some(score) => score_badge(score),
        None => format!("[{}]", format_optional_percent(None)),
    }
}

fn progress_bar(score: f64) -> String {
    let clamped = if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (clamped * BAR_WIDTH as f64).round() as usize;
    format!("|{}{}|", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}
