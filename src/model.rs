use std::ops::Deref;

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub result_type: String,
    pub summac_score: f64,
    pub qa_results: Vec<Preserved<QaResult>>,
    #[serde(default)]
    pub embedding_results: Vec<Preserved<EmbeddingResult>>,
    #[serde(default)]
    pub exact_missing: Vec<Preserved<MissingFact>>,
    #[serde(default)]
    pub fuzzy_missing: Vec<Preserved<MissingFact>>,
    #[serde(default)]
    pub timeline_issues: Vec<String>,
    #[serde(default)]
    pub media_type_issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Preserved::is_absent")]
    pub intent_scores: Preserved<IntentScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_facts_extracted: Option<SqlFacts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_summary_generated: Option<String>,
    /// Set on exported documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A typed view over one JSON value that serializes back as exactly the
/// value it was read from, so exports keep keys the typed side ignores.
#[derive(Debug, Clone, PartialEq)]
pub struct Preserved<T> {
    value: T,
    raw: Value,
}

impl<T> Preserved<T> {
    /// True for a defaulted value that never appeared in the input.
    pub fn is_absent(&self) -> bool {
        self.raw.is_null()
    }
}

impl<T> Deref for Preserved<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Default> Default for Preserved<T> {
    fn default() -> Self {
        Self {
            value: T::default(),
            raw: Value::Null,
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Preserved<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let value = T::deserialize(&raw).map_err(D::Error::custom)?;
        Ok(Self { value, raw })
    }
}

impl<T> Serialize for Preserved<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.raw.serialize(serializer)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QaResult {
    pub fact: String,
    pub question: String,
    #[serde(rename = "qa_answer", alias = "answer")]
    pub answer: String,
    pub score: f64,
    pub supported: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EmbeddingResult {
    pub fact: String,
    pub score: f64,
    pub present: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IntentScores {
    pub chunks: Vec<String>,
    pub embedding_scores: Vec<f64>,
    pub max_embedding_score: f64,
    pub reranker_scores: Vec<f64>,
    pub max_reranker_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlFacts {
    Text(String),
    List(Vec<String>),
}

impl SqlFacts {
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Text(text) => text.lines().collect(),
            Self::List(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

/// One entry of `exact_missing` / `fuzzy_missing`.
///
/// Upstream producers emit either `[key, actual, expected]` arrays or keyed
/// objects; both collapse into `Tuple` here so renderers never inspect raw
/// shapes. Anything else is kept verbatim as `Unknown`. Export goes through
/// [`Preserved`], so the source shape is what gets written back.
#[derive(Debug, Clone, PartialEq)]
pub enum MissingFact {
    Tuple {
        key: String,
        actual: Option<Value>,
        expected: Option<Value>,
    },
    Unknown(Value),
}

impl MissingFact {
    pub fn from_value(raw: Value) -> Self {
        match raw {
            Value::Array(items) if !items.is_empty() => {
                let mut items = items.into_iter();
                let key = items.next().map(key_text).unwrap_or_default();
                let actual = items.next().and_then(non_null);
                let expected = items.next().and_then(non_null);
                Self::Tuple {
                    key,
                    actual,
                    expected,
                }
            }
            Value::Object(mut fields) if fields.contains_key("key") => {
                let key = fields.remove("key").map(key_text).unwrap_or_default();
                let actual = take_first(&mut fields, &["actual", "actual_value"]);
                let expected = take_first(&mut fields, &["expected", "expected_value"]);
                Self::Tuple {
                    key,
                    actual,
                    expected,
                }
            }
            other => Self::Unknown(other),
        }
    }
}

fn key_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn non_null(value: Value) -> Option<Value> {
    if value.is_null() { None } else { Some(value) }
}

fn take_first(fields: &mut Map<String, Value>, names: &[&str]) -> Option<Value> {
    names
        .iter()
        .find_map(|name| fields.remove(*name))
        .and_then(non_null)
}

impl<'de> Deserialize<'de> for MissingFact {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::from_value(raw))
    }
}
