mod html;
mod text;

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::cli::{OutputFormat, ViewMode};
use crate::metrics::ReportMetrics;
use crate::model::ValidationReport;

pub use html::render_html;
pub use text::write_text;

pub const MISSING_PLACEHOLDER: &str = "missing";

/// Transient display toggles for one loaded report. Chunk indices are 0-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub expanded_chunks: BTreeSet<usize>,
    pub expand_all: bool,
    pub show_details: bool,
    pub show_prompt: bool,
    pub show_sql_facts: bool,
    pub show_llm_summary: bool,
}

impl ViewState {
    pub fn is_chunk_expanded(&self, index: usize) -> bool {
        self.expand_all || self.expanded_chunks.contains(&index)
    }

    pub fn toggle_chunk(&mut self, index: usize) {
        if !self.expanded_chunks.remove(&index) {
            self.expanded_chunks.insert(index);
        }
    }
}

/// How the text view tells the reader to reveal a hidden section. The
/// one-shot CLI takes flags, the interactive browser takes bare commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleHints {
    pub details: &'static str,
    pub prompt: &'static str,
    pub sql_facts: &'static str,
    pub llm_summary: &'static str,
}

impl ToggleHints {
    pub const CLI: Self = Self {
        details: "--details",
        prompt: "--show-prompt",
        sql_facts: "--show-sql-facts",
        llm_summary: "--show-llm-summary",
    };

    pub const BROWSE: Self = Self {
        details: "`details`",
        prompt: "`prompt`",
        sql_facts: "`sql`",
        llm_summary: "`llm`",
    };
}

pub fn render(
    report: &ValidationReport,
    view: &ViewState,
    mode: ViewMode,
    format: OutputFormat,
    hints: ToggleHints,
) -> Result<String> {
    let metrics = ReportMetrics::compute(report);
    match format {
        OutputFormat::Text => {
            let mut buffer = Vec::new();
            write_text(&mut buffer, report, &metrics, view, mode, hints)?;
            String::from_utf8(buffer).context("rendered text was not valid UTF-8")
        }
        OutputFormat::Html => Ok(render_html(report, &metrics, view, mode)),
        OutputFormat::Json => {
            let mut rendered = serde_json::to_string_pretty(&metrics)
                .context("failed to serialize report metrics")?;
            rendered.push('\n');
            Ok(rendered)
        }
    }
}

/// Missing-fact cell text; `None` when the value should show the placeholder badge.
pub(crate) fn value_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Number of intent rows: chunk and score arrays are not required to agree.
pub(crate) fn intent_row_count(report: &ValidationReport) -> usize {
    let intent = &report.intent_scores;
    intent
        .chunks
        .len()
        .max(intent.embedding_scores.len())
        .max(intent.reranker_scores.len())
}
