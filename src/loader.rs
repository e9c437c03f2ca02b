use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use thiserror::Error;

use crate::model::ValidationReport;

pub const REQUIRED_FIELDS: [&str; 3] = ["result_type", "summac_score", "qa_results"];

#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("file is not valid JSON: {0}")]
    MalformedInput(String),
    #[error(transparent)]
    SchemaViolation(#[from] SchemaViolation),
}

#[derive(Debug, Error, PartialEq)]
pub enum SchemaViolation {
    #[error("validation report must be a JSON object")]
    NotAnObject,
    #[error(
        "invalid validation report format: missing required field(s): {}",
        .0.join(", ")
    )]
    MissingFields(Vec<String>),
    #[error("invalid validation report format: {0}")]
    InvalidField(String),
}

impl LoadError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "malformed_input",
            Self::SchemaViolation(_) => "schema_violation",
        }
    }
}

/// Parses and shallow-validates one uploaded report.
///
/// Presence is checked only for [`REQUIRED_FIELDS`]; a key holding `null`
/// counts as absent. Nested fields fall back to defaults when missing but
/// must have the right JSON type when present.
pub fn load_report_bytes(bytes: &[u8]) -> Result<ValidationReport, LoadError> {
    let text =
        std::str::from_utf8(bytes).map_err(|err| LoadError::MalformedInput(err.to_string()))?;
    let value: Value =
        serde_json::from_str(text).map_err(|err| LoadError::MalformedInput(err.to_string()))?;
    load_report_value(value)
}

pub fn load_report_value(value: Value) -> Result<ValidationReport, LoadError> {
    let Some(object) = value.as_object() else {
        return Err(SchemaViolation::NotAnObject.into());
    };

    let missing = missing_required_fields(object);
    if !missing.is_empty() {
        return Err(SchemaViolation::MissingFields(missing).into());
    }

    serde_json::from_value(value)
        .map_err(|err| SchemaViolation::InvalidField(err.to_string()).into())
}

pub fn load_report_path(path: &Path) -> Result<ValidationReport> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let report = load_report_bytes(&raw)
        .with_context(|| format!("failed to load validation report {}", path.display()))?;
    Ok(report)
}

fn missing_required_fields(object: &serde_json::Map<String, Value>) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|field| object.get(**field).is_none_or(Value::is_null))
        .map(|field| (*field).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::MissingFact;

    fn minimal() -> Value {
        json!({
            "result_type": "summary_validation",
            "summac_score": 0.82,
            "qa_results": [
                {"fact": "Revenue grew", "question": "Did revenue grow?", "qa_answer": "yes", "score": 0.9, "supported": true}
            ]
        })
    }

    #[test]
    fn rejects_non_json_bytes_as_malformed_input() {
        let err = load_report_bytes(b"{ not json").expect_err("should fail to parse");
        assert!(matches!(err, LoadError::MalformedInput(_)), "got {err:?}");
        assert_eq!(err.kind(), "malformed_input");
    }

    #[test]
    fn rejects_invalid_utf8_as_malformed_input() {
        let err = load_report_bytes(&[0xff, 0xfe, 0x7b]).expect_err("invalid utf-8");
        assert!(matches!(err, LoadError::MalformedInput(_)));
    }

    #[test]
    fn names_every_missing_required_field() {
        let err = load_report_bytes(br#"{"result_type": "x"}"#).expect_err("missing fields");
        assert_eq!(
            err,
            LoadError::SchemaViolation(SchemaViolation::MissingFields(vec![
                "summac_score".to_string(),
                "qa_results".to_string(),
            ]))
        );
        let message = err.to_string();
        assert!(message.contains("summac_score"), "{message}");
        assert!(message.contains("qa_results"), "{message}");
    }

    #[test]
    fn null_required_field_counts_as_missing() {
        let mut value = minimal();
        value["qa_results"] = Value::Null;
        let err = load_report_value(value).expect_err("null qa_results");
        assert_eq!(
            err,
            LoadError::SchemaViolation(SchemaViolation::MissingFields(vec![
                "qa_results".to_string()
            ]))
        );
    }

    #[test]
    fn zero_score_and_empty_results_are_accepted() {
        let report = load_report_bytes(
            br#"{"result_type": "", "summac_score": 0, "qa_results": []}"#,
        )
        .expect("zero score is present");
        assert_eq!(report.summac_score, 0.0);
        assert!(report.qa_results.is_empty());
        assert!(report.embedding_results.is_empty());
    }

    #[test]
    fn top_level_array_is_a_schema_violation() {
        let err = load_report_bytes(b"[1, 2]").expect_err("array is not a report");
        assert_eq!(err, LoadError::SchemaViolation(SchemaViolation::NotAnObject));
    }

    #[test]
    fn wrong_nested_type_is_reported_as_invalid_field() {
        let mut value = minimal();
        value["qa_results"][0]["score"] = json!("high");
        let err = load_report_value(value).expect_err("string score");
        assert!(
            matches!(
                err,
                LoadError::SchemaViolation(SchemaViolation::InvalidField(_))
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn embedding_results_are_optional() {
        let report = load_report_value(minimal()).expect("minimal report loads");
        assert_eq!(report.result_type, "summary_validation");
        assert_eq!(report.qa_results[0].answer, "yes");
        assert!(report.embedding_results.is_empty());
        assert!(report.intent_scores.chunks.is_empty());
    }

    #[test]
    fn missing_fact_shapes_are_normalized_at_ingestion() {
        let mut value = minimal();
        value["exact_missing"] = json!([["k1", "a", "b"], {"key": "k2", "expected": 3}, 7]);
        let report = load_report_value(value).expect("report loads");
        assert_eq!(report.exact_missing.len(), 3);
        assert!(matches!(
            &*report.exact_missing[0],
            MissingFact::Tuple { key, .. } if key == "k1"
        ));
        assert!(matches!(
            &*report.exact_missing[1],
            MissingFact::Tuple { key, expected: Some(_), .. } if key == "k2"
        ));
        assert_eq!(*report.exact_missing[2], MissingFact::Unknown(json!(7)));
    }

    #[test]
    fn unknown_top_level_keys_are_preserved() {
        let mut value = minimal();
        value["pipeline_version"] = json!("2.1");
        let report = load_report_value(value).expect("report loads");
        assert_eq!(report.extra.get("pipeline_version"), Some(&json!("2.1")));
    }

    #[test]
    fn path_loading_ignores_file_extension() {
        let dir = std::env::temp_dir().join(format!("valreport-loader-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("report.txt");
        fs::write(&path, minimal().to_string()).expect("write report");

        let report = load_report_path(&path).expect("json content loads from .txt");
        assert_eq!(report.result_type, "summary_validation");
        assert_eq!(report.qa_results.len(), 1);

        fs::remove_dir_all(&dir).expect("cleanup temp dir");
    }

    #[test]
    fn path_loading_reports_missing_file_with_path() {
        let path = std::env::temp_dir().join("valreport-loader-absent/report.json");
        let err = load_report_path(&path).expect_err("missing file");
        assert!(err.to_string().contains("failed to read"), "{err:#}");
    }
}
