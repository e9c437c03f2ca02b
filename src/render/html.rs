//! Self-contained HTML dashboard. Chunks use `<details>` so expansion works
//! without scripts; the view state only decides which start open.

use std::fmt::Write;

use super::{MISSING_PLACEHOLDER, ViewState, intent_row_count, value_text};
use crate::cli::ViewMode;
use crate::metrics::{ReportMetrics, ScoreBand, format_optional_percent, format_percent};
use crate::model::{MissingFact, Preserved, ValidationReport};

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:72rem;margin:2rem auto;padding:0 1rem;color:#1f2937}\
section{border:1px solid #e5e7eb;border-radius:.5rem;padding:1rem 1.25rem;margin-bottom:1.25rem}\
table{width:100%;border-collapse:collapse}th,td{text-align:left;padding:.5rem;border-bottom:1px solid #e5e7eb}\
.badge{display:inline-block;padding:.1rem .5rem;border-radius:.75rem;font-size:.85rem;font-weight:600}\
.high{background:#dcfce7;color:#166534}.medium{background:#fef3c7;color:#92400e}.low{background:#fee2e2;color:#991b1b}\
.ok{background:#dcfce7;color:#166534}.bad{background:#fee2e2;color:#991b1b}.placeholder{background:#e5e7eb;color:#4b5563}\
.headline{font-size:3rem;font-weight:700}.issues{background:#fffbeb}pre{white-space:pre-wrap}";

pub fn render_html(
    report: &ValidationReport,
    metrics: &ReportMetrics,
    view: &ViewState,
    mode: ViewMode,
) -> String {
    let mut html = String::with_capacity(16_384);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    push_line(
        &mut html,
        format_args!(
            "<title>Validation Report - {}</title>",
            escape_html(&report.result_type)
        ),
    );
    push_line(&mut html, format_args!("<style>{STYLE}</style>"));
    html.push_str("</head>\n<body>\n");

    match mode {
        ViewMode::Full => push_full(&mut html, report, view),
        ViewMode::Summary => {
            push_summary(&mut html, report, metrics, view);
            if view.show_details {
                push_full(&mut html, report, view);
            }
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn push_summary(
    html: &mut String,
    report: &ValidationReport,
    metrics: &ReportMetrics,
    view: &ViewState,
) {
    html.push_str("<section>\n");
    push_line(
        html,
        format_args!(
            "<h1>Validation Summary</h1><p>{}</p>",
            escape_html(&report.result_type)
        ),
    );
    html.push_str("<table>\n");
    summary_row(html, "SummaC score", &score_badge(metrics.summac_score));
    summary_row(
        html,
        "Facts supported",
        &format!("{}/{}", metrics.supported_count, metrics.total_facts),
    );
    summary_row(
        html,
        "Embeddings present",
        &format!("{}/{}", metrics.present_count, metrics.total_embeddings),
    );
    summary_row(html, "Avg QA score", &optional_badge(metrics.avg_qa_score));
    summary_row(
        html,
        "Avg embedding score",
        &optional_badge(metrics.avg_embedding_score),
    );
    summary_row(
        html,
        "Issues",
        &format!(
            "{} (timeline {}, media type {})",
            metrics.total_issues, metrics.timeline_issue_count, metrics.media_type_issue_count
        ),
    );
    summary_row(
        html,
        "Intent score",
        &format!(
            "{} via {}",
            score_badge(metrics.dominant_intent.score),
            metrics.dominant_intent.source
        ),
    );
    html.push_str("</table>\n");

    if let Some(prompt) = &report.user_prompt {
        push_optional(html, "User Prompt", view.show_prompt, |out| {
            push_line(out, format_args!("<pre>{}</pre>", escape_html(prompt)));
        });
    }
    if let Some(facts) = &report.sql_facts_extracted {
        push_optional(html, "SQL Facts Extracted", view.show_sql_facts, |out| {
            out.push_str("<ul>\n");
            for line in facts.lines() {
                push_line(out, format_args!("<li>{}</li>", escape_html(line)));
            }
            out.push_str("</ul>\n");
        });
    }
    if let Some(summary) = &report.llm_summary_generated {
        push_optional(html, "LLM Summary Generated", view.show_llm_summary, |out| {
            push_line(out, format_args!("<pre>{}</pre>", escape_html(summary)));
        });
    }
    html.push_str("</section>\n");
}

fn summary_row(html: &mut String, label: &str, value_html: &str) {
    push_line(
        html,
        format_args!("<tr><th>{}</th><td>{value_html}</td></tr>", escape_html(label)),
    );
}

/// Hidden sections still render, collapsed, so the page stays usable on its own.
fn push_optional<F>(html: &mut String, title: &str, shown: bool, body: F)
where
    F: FnOnce(&mut String),
{
    let open = if shown { " open" } else { "" };
    push_line(
        html,
        format_args!("<details{open}><summary>{}</summary>", escape_html(title)),
    );
    body(html);
    html.push_str("</details>\n");
}

fn push_full(html: &mut String, report: &ValidationReport, view: &ViewState) {
    html.push_str("<section>\n");
    push_line(
        html,
        format_args!(
            "<h1>Validation Report</h1><p>{}</p>",
            escape_html(&report.result_type)
        ),
    );
    html.push_str("<h2>SummaC Factual Consistency Score</h2>\n");
    push_line(
        html,
        format_args!(
            "<div class=\"headline\">{}</div>{}",
            format_percent(report.summac_score),
            score_badge(report.summac_score)
        ),
    );
    push_line(
        html,
        format_args!(
            "<progress max=\"100\" value=\"{:.1}\"></progress>",
            report.summac_score * 100.0
        ),
    );
    html.push_str("</section>\n");

    html.push_str("<section>\n<h2>QA-based Fact Checking</h2>\n<table>\n");
    html.push_str(
        "<tr><th>Fact</th><th>Question</th><th>Extracted Answer</th><th>Score</th><th>Supported</th></tr>\n",
    );
    for qa in &report.qa_results {
        push_line(
            html,
            format_args!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&qa.fact),
                escape_html(&qa.question),
                escape_html(&qa.answer),
                score_badge(qa.score),
                flag_badge(qa.supported, "Supported", "Not Supported"),
            ),
        );
    }
    html.push_str("</table>\n</section>\n");

    push_intent(html, report, view);
    push_missing(html, "Exact Missing Facts", "exact", &report.exact_missing);
    push_missing(html, "Fuzzy Missing Facts", "fuzzy", &report.fuzzy_missing);

    html.push_str("<section>\n<h2>Embedding Results</h2>\n<table>\n");
    html.push_str("<tr><th>Fact</th><th>Score</th><th>Present</th></tr>\n");
    for item in &report.embedding_results {
        push_line(
            html,
            format_args!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&item.fact),
                score_badge(item.score),
                flag_badge(item.present, "Present", "Missing"),
            ),
        );
    }
    html.push_str("</table>\n</section>\n");

    push_issues(html, "Timeline Issues", &report.timeline_issues);
    push_issues(html, "Media Type Issues", &report.media_type_issues);
}

fn push_intent(html: &mut String, report: &ValidationReport, view: &ViewState) {
    let intent = &report.intent_scores;
    html.push_str("<section>\n<h2>Intent Validation</h2>\n");
    for index in 0..intent_row_count(report) {
        let open = if view.is_chunk_expanded(index) {
            " open"
        } else {
            ""
        };
        push_line(
            html,
            format_args!(
                "<details{open}><summary>Chunk {} &middot; embedding {} &middot; reranker {}</summary>",
                index + 1,
                optional_badge(intent.embedding_scores.get(index).copied()),
                optional_badge(intent.reranker_scores.get(index).copied()),
            ),
        );
        let text = intent
            .chunks
            .get(index)
            .map(|chunk| escape_html(chunk))
            .unwrap_or_else(|| "(no chunk text)".to_string());
        push_line(html, format_args!("<pre>{text}</pre></details>"));
    }
    push_line(
        html,
        format_args!(
            "<p>Max Embedding Score {}</p><p>Max Reranker Score {}</p>",
            score_badge(intent.max_embedding_score),
            score_badge(intent.max_reranker_score)
        ),
    );
    html.push_str("</section>\n");
}

fn push_missing(html: &mut String, title: &str, kind: &str, facts: &[Preserved<MissingFact>]) {
    html.push_str("<section>\n");
    push_line(html, format_args!("<h2>{}</h2>", escape_html(title)));
    if facts.is_empty() {
        push_line(html, format_args!("<p>No {kind} missing facts found</p>"));
        html.push_str("</section>\n");
        return;
    }

    html.push_str("<table>\n<tr><th>Key</th><th>Actual</th><th>Expected</th></tr>\n");
    for fact in facts {
        match &**fact {
            MissingFact::Tuple {
                key,
                actual,
                expected,
            } => push_line(
                html,
                format_args!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape_html(key),
                    value_cell(value_text(actual.as_ref())),
                    value_cell(value_text(expected.as_ref())),
                ),
            ),
            MissingFact::Unknown(raw) => push_line(
                html,
                format_args!(
                    "<tr><td colspan=\"3\"><code>{}</code></td></tr>",
                    escape_html(&raw.to_string())
                ),
            ),
        }
    }
    html.push_str("</table>\n</section>\n");
}

fn push_issues(html: &mut String, title: &str, issues: &[String]) {
    if issues.is_empty() {
        return;
    }
    html.push_str("<section class=\"issues\">\n");
    push_line(html, format_args!("<h2>{}</h2>\n<ul>", escape_html(title)));
    for issue in issues {
        push_line(html, format_args!("<li>{}</li>", escape_html(issue)));
    }
    html.push_str("</ul>\n</section>\n");
}

fn push_line(html: &mut String, args: std::fmt::Arguments<'_>) {
    // Writing into a String cannot fail.
    let _ = html.write_fmt(args);
    html.push('\n');
}

fn value_cell(text: Option<String>) -> String {
    match text {
        Some(text) => escape_html(&text),
        None => format!("<span class=\"badge placeholder\">{MISSING_PLACEHOLDER}</span>"),
    }
}

fn score_badge(score: f64) -> String {
    let band = ScoreBand::from_score(score);
    let class = match band {
        ScoreBand::High => "high",
        ScoreBand::Medium => "medium",
        ScoreBand::Low => "low",
    };
    format!(
        "<span class=\"badge {class}\">{} ({band})</span>",
        format_percent(score)
    )
}

fn optional_badge(score: Option<f64>) -> String {
    match score {
        Some(score) => score_badge(score),
        None => format!(
            "<span class=\"badge placeholder\">{}</span>",
            format_optional_percent(None)
        ),
    }
}

fn flag_badge(flag: bool, yes: &str, no: &str) -> String {
    if flag {
        format!("<span class=\"badge ok\">{yes}</span>")
    } else {
        format!("<span class=\"badge bad\">{no}</span>")
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::super::tests::sample_report;
    use super::*;

    fn render(view: &ViewState, mode: ViewMode) -> String {
        let report = sample_report();
        let metrics = ReportMetrics::compute(&report);
        render_html(&report, &metrics, view, mode)
    }

    #[test]
    fn escapes_report_text() {
        let html = render(&ViewState::default(), ViewMode::Full);
        assert!(html.contains("Revenue grew &lt;fast&gt;."));
        assert!(!html.contains("<fast>"));
    }

    #[test]
    fn expanded_chunks_start_open() {
        let mut view = ViewState::default();
        view.toggle_chunk(0);
        let html = render(&view, ViewMode::Full);
        assert!(html.contains("<details open><summary>Chunk 1"));
        assert!(html.contains("<details><summary>Chunk 2"));
    }

    #[test]
    fn null_missing_value_renders_placeholder_badge() {
        let html = render(&ViewState::default(), ViewMode::Full);
        assert!(html.contains("<span class=\"badge placeholder\">missing</span>"));
        assert!(html.contains("No fuzzy missing facts found"));
    }

    #[test]
    fn summary_without_details_omits_tables() {
        let html = render(&ViewState::default(), ViewMode::Summary);
        assert!(html.contains("Validation Summary"));
        assert!(html.contains("<details><summary>User Prompt</summary>"));
        assert!(!html.contains("QA-based Fact Checking"));
    }

    #[test]
    fn escape_html_handles_all_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }
}
