use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use regex::Regex;
use serde_json::Value;

use crate::model::ValidationReport;
use crate::util::write_json_pretty;

/// The report as it should be written to disk: every original field plus `timestamp`.
pub fn export_document(report: &ValidationReport, now: DateTime<Utc>) -> Result<Value> {
    let mut exported = report.clone();
    exported.timestamp = Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));
    serde_json::to_value(&exported).context("failed to serialize exported report")
}

pub fn export_file_name(result_type: &str, date: NaiveDate) -> Result<String> {
    Ok(format!(
        "validation-report-{}-{}.json",
        file_name_slug(result_type)?,
        date.format("%Y-%m-%d")
    ))
}

pub fn write_export(
    report: &ValidationReport,
    out_dir: &Path,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let document = export_document(report, now)?;
    let path = out_dir.join(export_file_name(&report.result_type, now.date_naive())?);
    write_json_pretty(&path, &document)?;
    Ok(path)
}

fn file_name_slug(result_type: &str) -> Result<String> {
    let pattern =
        Regex::new(r"[^A-Za-z0-9._-]+").context("failed to compile file name slug regex")?;

    let slug = pattern.replace_all(result_type.trim(), "-");
    let slug = slug.trim_matches(|ch: char| ch == '-' || ch == '.');
    if slug.is_empty() {
        Ok("report".to_string())
    } else {
        Ok(slug.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::loader::{load_report_bytes, load_report_value};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    fn report() -> ValidationReport {
        load_report_value(json!({
            "result_type": "summary validation/v2",
            "summac_score": 0.75,
            "qa_results": [{"fact": "f", "question": "q", "qa_answer": "a", "score": 0.5, "supported": true}],
            "exact_missing": [["k", 1, null], "odd entry"],
            "sql_facts_extracted": "x = 1",
            "pipeline_version": "2.1"
        }))
        .expect("fixture loads")
    }

    #[test]
    fn export_adds_iso_timestamp_and_keeps_fields() {
        let document = export_document(&report(), fixed_now()).expect("export");
        assert_eq!(document["timestamp"], json!("2026-10-18T09:30:00.000Z"));
        assert_eq!(document["result_type"], json!("summary validation/v2"));
        assert_eq!(document["qa_results"][0]["qa_answer"], json!("a"));
        assert_eq!(document["exact_missing"], json!([["k", 1, null], "odd entry"]));
        assert_eq!(document["pipeline_version"], json!("2.1"));
    }

    #[test]
    fn export_keeps_unknown_keys_inside_entries() {
        let qa_results = json!([{"answer": "a", "confidence": 0.4, "fact": "f"}]);
        let exact_missing = json!([
            {"expected_value": 1, "key": "k", "source": "db"},
            ["k2", 1, 2, "extra"]
        ]);
        let embedding_results = json!([{"fact": "f", "score": 0.7, "model": "e5"}]);
        let intent_scores = json!({"chunks": ["c"], "reranker_model": "bge"});
        let report = load_report_value(json!({
            "result_type": "summary_validation",
            "summac_score": 0.75,
            "qa_results": qa_results,
            "embedding_results": embedding_results,
            "exact_missing": exact_missing,
            "intent_scores": intent_scores
        }))
        .expect("fixture loads");

        let document = export_document(&report, fixed_now()).expect("export");
        assert_eq!(document["qa_results"], qa_results);
        assert_eq!(document["embedding_results"], embedding_results);
        assert_eq!(document["exact_missing"], exact_missing);
        assert_eq!(document["intent_scores"], intent_scores);
    }

    #[test]
    fn export_omits_intent_scores_absent_from_input() {
        let document = export_document(&report(), fixed_now()).expect("export");
        assert!(document.get("intent_scores").is_none());
    }

    #[test]
    fn reloading_export_reproduces_report_with_timestamp() {
        let original = report();
        let document = export_document(&original, fixed_now()).expect("export");
        let bytes = serde_json::to_vec(&document).expect("serialize");
        let reloaded = load_report_bytes(&bytes).expect("export reloads");

        let mut expected = original;
        expected.timestamp = Some("2026-10-18T09:30:00.000Z".to_string());
        assert_eq!(reloaded, expected);
    }

    #[test]
    fn file_name_encodes_result_type_and_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date");
        assert_eq!(
            export_file_name("summary validation/v2", date).expect("file name"),
            "validation-report-summary-validation-v2-2026-10-18.json"
        );
        assert_eq!(
            export_file_name("  ///  ", date).expect("file name"),
            "validation-report-report-2026-10-18.json"
        );
    }

    #[test]
    fn write_export_creates_file_in_out_dir() {
        let out_dir = std::env::temp_dir().join(format!(
            "valreport-export-test-{}-{}",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let path = write_export(&report(), &out_dir, fixed_now()).expect("write export");
        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("validation-report-summary-validation-v2-2026-10-18.json")
        );
        let raw = fs::read(&path).expect("export readable");
        let reloaded = load_report_bytes(&raw).expect("export reloads");
        assert_eq!(reloaded.timestamp.as_deref(), Some("2026-10-18T09:30:00.000Z"));
        fs::remove_dir_all(&out_dir).expect("cleanup");
    }
}
