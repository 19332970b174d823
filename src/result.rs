//! Extraction result types.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::job::ExtractionMode;

/// Outcome of one extraction job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    /// Content was fetched and extracted.
    Success,
    /// All attempts were exhausted without a usable page.
    Failed,
}

/// The result of extracting one URL.
///
/// Produced by exactly one job and immutable afterwards. Failed results keep
/// the URL, the final error and the attempt count; content fields stay empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// The requested URL.
    pub url: String,
    /// Extracted page title (empty for failed results).
    pub title: String,
    /// Extracted paragraph content (empty for failed results).
    pub content: String,
    /// Whitespace-delimited word count of `content`.
    pub word_count: u32,
    /// Whether the job succeeded.
    pub status: ExtractionStatus,
    /// Final error message for failed results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of attempts consumed (1-based).
    pub attempts: u32,
    /// Mode the job ran under.
    pub extraction_mode: ExtractionMode,
    /// UTC timestamp of result creation (RFC 3339).
    pub extraction_time: String,
    /// Truncation summary, present when summarization was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Name of the registry source this result came from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    /// Priority of the registry source (1 = highest).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_priority: Option<u8>,
    /// Query relevance in [0, 1], set by the search layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

impl ExtractionResult {
    /// Creates a successful result from extracted content.
    pub fn success(
        url: impl Into<String>,
        mode: ExtractionMode,
        title: impl Into<String>,
        content: impl Into<String>,
        word_count: u32,
        attempts: u32,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            content: content.into(),
            word_count,
            status: ExtractionStatus::Success,
            error: None,
            attempts,
            extraction_mode: mode,
            extraction_time: now_rfc3339(),
            summary: None,
            source_name: None,
            source_priority: None,
            relevance_score: None,
        }
    }

    /// Creates a failed result carrying the final error.
    pub fn failed(
        url: impl Into<String>,
        mode: ExtractionMode,
        error: impl Into<String>,
        attempts: u32,
    ) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            content: String::new(),
            word_count: 0,
            status: ExtractionStatus::Failed,
            error: Some(error.into()),
            attempts,
            extraction_mode: mode,
            extraction_time: now_rfc3339(),
            summary: None,
            source_name: None,
            source_priority: None,
            relevance_score: None,
        }
    }

    /// Attaches a summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Attaches the originating registry source.
    pub fn with_source(mut self, name: impl Into<String>, priority: u8) -> Self {
        self.source_name = Some(name.into());
        self.source_priority = Some(priority);
        self
    }

    /// Attaches a query relevance score.
    pub fn with_relevance(mut self, score: f64) -> Self {
        self.relevance_score = Some(score);
        self
    }

    /// Returns true when the job succeeded.
    pub fn is_success(&self) -> bool {
        self.status == ExtractionStatus::Success
    }

    /// Relevance score, defaulting to 0.0 when unset.
    pub fn relevance(&self) -> f64 {
        self.relevance_score.unwrap_or(0.0)
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// An ordered, URL-deduplicated collection of extraction results.
///
/// Invariants: no two entries share a URL (first-produced wins), and entries
/// are sorted descending by relevance with ties keeping arrival order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RankedResults {
    results: Vec<ExtractionResult>,
}

impl RankedResults {
    /// Builds a ranked set from results in arrival order.
    pub fn from_unranked(results: Vec<ExtractionResult>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut unique: Vec<ExtractionResult> = results
            .into_iter()
            .filter(|r| seen.insert(r.url.clone()))
            .collect();

        // Stable sort keeps arrival order for equal scores.
        unique.sort_by(|a, b| {
            b.relevance()
                .partial_cmp(&a.relevance())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Self { results: unique }
    }

    /// Returns the ranked results.
    pub fn items(&self) -> &[ExtractionResult] {
        &self.results
    }

    /// Consumes the set, yielding the ranked results.
    pub fn into_vec(self) -> Vec<ExtractionResult> {
        self.results
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(url: &str) -> ExtractionResult {
        ExtractionResult::success(url, ExtractionMode::Light, "Title", "body text", 2, 1)
    }

    #[test]
    fn test_success_result_fields() {
        let result = success("http://a.test");
        assert_eq!(result.url, "http://a.test");
        assert_eq!(result.title, "Title");
        assert_eq!(result.word_count, 2);
        assert_eq!(result.attempts, 1);
        assert!(result.is_success());
        assert!(result.error.is_none());
        assert!(!result.extraction_time.is_empty());
    }

    #[test]
    fn test_failed_result_fields() {
        let result =
            ExtractionResult::failed("http://b.test", ExtractionMode::Browser, "boom", 3);
        assert_eq!(result.status, ExtractionStatus::Failed);
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert_eq!(result.attempts, 3);
        assert!(result.title.is_empty());
        assert!(result.content.is_empty());
        assert_eq!(result.word_count, 0);
        assert!(!result.is_success());
    }

    #[test]
    fn test_with_summary() {
        let result = success("http://a.test").with_summary("short version");
        assert_eq!(result.summary.as_deref(), Some("short version"));
    }

    #[test]
    fn test_with_source() {
        let result = success("http://a.test").with_source("TechCrunch", 2);
        assert_eq!(result.source_name.as_deref(), Some("TechCrunch"));
        assert_eq!(result.source_priority, Some(2));
    }

    #[test]
    fn test_with_relevance() {
        let result = success("http://a.test").with_relevance(0.75);
        assert_eq!(result.relevance_score, Some(0.75));
        assert_eq!(result.relevance(), 0.75);
    }

    #[test]
    fn test_relevance_defaults_to_zero() {
        assert_eq!(success("http://a.test").relevance(), 0.0);
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let json = serde_json::to_string(&success("http://a.test")).unwrap();
        assert!(json.contains("\"status\":\"success\""));
        assert!(!json.contains("\"error\""));
        assert!(!json.contains("\"summary\""));
        assert!(!json.contains("\"source_name\""));
    }

    #[test]
    fn test_serialization_includes_error() {
        let result = ExtractionResult::failed("u", ExtractionMode::Light, "nope", 1);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"status\":\"failed\""));
        assert!(json.contains("\"error\":\"nope\""));
    }

    #[test]
    fn test_ranked_deduplicates_first_wins() {
        let first = success("http://a.test").with_relevance(0.2);
        let dup = success("http://a.test").with_relevance(0.9);
        let ranked = RankedResults::from_unranked(vec![first, dup]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked.items()[0].relevance(), 0.2);
    }

    #[test]
    fn test_ranked_sorts_descending() {
        let low = success("http://a.test").with_relevance(0.1);
        let high = success("http://b.test").with_relevance(0.9);
        let mid = success("http://c.test").with_relevance(0.5);
        let ranked = RankedResults::from_unranked(vec![low, high, mid]);
        let scores: Vec<f64> = ranked.items().iter().map(|r| r.relevance()).collect();
        assert_eq!(scores, vec![0.9, 0.5, 0.1]);
    }

    #[test]
    fn test_ranked_ties_keep_arrival_order() {
        let a = success("http://a.test").with_relevance(0.5);
        let b = success("http://b.test").with_relevance(0.5);
        let c = success("http://c.test").with_relevance(0.5);
        let ranked = RankedResults::from_unranked(vec![a, b, c]);
        let urls: Vec<&str> = ranked.items().iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["http://a.test", "http://b.test", "http://c.test"]);
    }

    #[test]
    fn test_ranked_unset_relevance_sorts_last() {
        let scored = success("http://a.test").with_relevance(0.3);
        let unscored = success("http://b.test");
        let ranked = RankedResults::from_unranked(vec![unscored, scored]);
        assert_eq!(ranked.items()[0].url, "http://a.test");
    }

    #[test]
    fn test_ranked_empty() {
        let ranked = RankedResults::from_unranked(vec![]);
        assert!(ranked.is_empty());
        assert_eq!(ranked.len(), 0);
    }

    #[test]
    fn test_ranked_into_vec() {
        let ranked = RankedResults::from_unranked(vec![success("http://a.test")]);
        let inner = ranked.into_vec();
        assert_eq!(inner.len(), 1);
    }
}
