use std::fmt;

use serde::Serialize;

use crate::model::ValidationReport;

const HIGH_SCORE_MIN: f64 = 0.8;
const MEDIUM_SCORE_MIN: f64 = 0.6;

/// Display category for a score in [0,1]. Every view uses these cutoffs.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_SCORE_MIN {
            Self::High
        } else if score >= MEDIUM_SCORE_MIN {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum IntentSource {
    Embedding,
    Reranker,
}

impl IntentSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Embedding => "Embedding",
            Self::Reranker => "Reranker",
        }
    }
}

impl fmt::Display for IntentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct DominantIntent {
    pub source: IntentSource,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetrics {
    pub result_type: String,
    pub summac_score: f64,
    pub summac_band: ScoreBand,
    pub supported_count: usize,
    pub total_facts: usize,
    pub present_count: usize,
    pub total_embeddings: usize,
    pub timeline_issue_count: usize,
    pub media_type_issue_count: usize,
    pub total_issues: usize,
    pub avg_qa_score: Option<f64>,
    pub avg_embedding_score: Option<f64>,
    pub dominant_intent: DominantIntent,
}

impl ReportMetrics {
    pub fn compute(report: &ValidationReport) -> Self {
        let supported_count = report.qa_results.iter().filter(|qa| qa.supported).count();
        let present_count = report
            .embedding_results
            .iter()
            .filter(|item| item.present)
            .count();
        let timeline_issue_count = report.timeline_issues.len();
        let media_type_issue_count = report.media_type_issues.len();

        Self {
            result_type: report.result_type.clone(),
            summac_score: report.summac_score,
            summac_band: ScoreBand::from_score(report.summac_score),
            supported_count,
            total_facts: report.qa_results.len(),
            present_count,
            total_embeddings: report.embedding_results.len(),
            timeline_issue_count,
            media_type_issue_count,
            total_issues: timeline_issue_count + media_type_issue_count,
            avg_qa_score: mean(report.qa_results.iter().map(|qa| qa.score)),
            avg_embedding_score: mean(report.embedding_results.iter().map(|item| item.score)),
            dominant_intent: dominant_intent(
                report.intent_scores.max_embedding_score,
                report.intent_scores.max_reranker_score,
            ),
        }
    }
}

/// Ties go to the embedding score.
pub fn dominant_intent(embedding_score: f64, reranker_score: f64) -> DominantIntent {
    if embedding_score >= reranker_score {
        DominantIntent {
            source: IntentSource::Embedding,
            score: embedding_score,
        }
    } else {
        DominantIntent {
            source: IntentSource::Reranker,
            score: reranker_score,
        }
    }
}

/// `None` for an empty sequence.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0_usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

pub fn format_percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

pub fn format_optional_percent(score: Option<f64>) -> String {
    score.map(format_percent).unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::loader::load_report_value;

    fn report(value: serde_json::Value) -> ValidationReport {
        load_report_value(value).expect("fixture should load")
    }

    #[test]
    fn qa_averages_and_counts_match_two_fact_example() {
        let report = report(json!({
            "result_type": "t",
            "summac_score": 0.5,
            "qa_results": [
                {"score": 0.9, "supported": true},
                {"score": 0.3, "supported": false}
            ]
        }));
        let metrics = ReportMetrics::compute(&report);
        assert_eq!(metrics.supported_count, 1);
        assert_eq!(metrics.total_facts, 2);
        let avg = metrics.avg_qa_score.expect("two facts have a mean");
        assert!((avg - 0.6).abs() < 1e-12, "avg={avg}");
    }

    #[test]
    fn counts_never_exceed_totals() {
        let report = report(json!({
            "result_type": "t",
            "summac_score": 0.5,
            "qa_results": [{"supported": true}, {"supported": true}, {"supported": false}],
            "embedding_results": [{"present": true}, {"present": false}],
            "timeline_issues": ["late"],
            "media_type_issues": ["pdf", "png"]
        }));
        let metrics = ReportMetrics::compute(&report);
        assert!(metrics.supported_count <= metrics.total_facts);
        assert!(metrics.present_count <= metrics.total_embeddings);
        assert_eq!(metrics.present_count, 1);
        assert_eq!(metrics.total_issues, 3);
    }

    #[test]
    fn empty_sequences_have_no_average() {
        let report = report(json!({
            "result_type": "t",
            "summac_score": 0.5,
            "qa_results": []
        }));
        let metrics = ReportMetrics::compute(&report);
        assert_eq!(metrics.avg_qa_score, None);
        assert_eq!(metrics.avg_embedding_score, None);
        assert_eq!(format_optional_percent(metrics.avg_qa_score), "n/a");
    }

    #[test]
    fn dominant_intent_prefers_reranker_when_higher() {
        let dominant = dominant_intent(0.7, 0.9);
        assert_eq!(dominant.source, IntentSource::Reranker);
        assert_eq!(dominant.score, 0.9);
        assert_eq!(dominant.source.to_string(), "Reranker");
    }

    #[test]
    fn dominant_intent_tie_goes_to_embedding() {
        let dominant = dominant_intent(0.75, 0.75);
        assert_eq!(dominant.source, IntentSource::Embedding);
    }

    #[test]
    fn score_band_boundaries() {
        assert_eq!(ScoreBand::from_score(0.8), ScoreBand::High);
        assert_eq!(ScoreBand::from_score(0.79), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_score(0.6), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_score(0.59), ScoreBand::Low);
        assert_eq!(ScoreBand::from_score(0.5), ScoreBand::Low);
        assert_eq!(ScoreBand::from_score(f64::NAN), ScoreBand::Low);
    }

    #[test]
    fn percent_formatting_uses_one_decimal() {
        assert_eq!(format_percent(0.8567), "85.7%");
        assert_eq!(format_percent(1.0), "100.0%");
    }
}
