//! Search orchestration over the source registry.

use std::sync::Arc;

use tracing::{debug, info};

use crate::job::{ExtractionMode, JobSpec};
use crate::ranker;
use crate::registry::{Source, SourceRegistry};
use crate::result::RankedResults;
use crate::scheduler::ExtractionScheduler;
use crate::{Result, SiftError};

/// Keyword fan-out cap for category-wide searches.
const CATEGORY_KEYWORD_CAP: usize = 5;

/// Result fan-out cap per category keyword.
const CATEGORY_RESULTS_PER_KEYWORD: usize = 3;

/// Composes the registry, ranker and scheduler into query-driven searches.
pub struct Searcher {
    registry: Arc<SourceRegistry>,
    scheduler: ExtractionScheduler,
}

impl Searcher {
    /// Creates a searcher over a loaded registry.
    pub fn new(registry: SourceRegistry, scheduler: ExtractionScheduler) -> Self {
        Self {
            registry: Arc::new(registry),
            scheduler,
        }
    }

    /// Returns the source registry.
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Searches configured sources for a query.
    ///
    /// Candidates come from the category's member list when `category` is
    /// given, otherwise from keyword-scoring all sources. The top
    /// `max_results` candidates are fetched through the scheduler; successes
    /// are annotated with their source and query relevance, deduplicated by
    /// URL (first produced wins) and sorted by relevance, best first. Failed
    /// fetches are excluded; they remain visible in the scheduler's error
    /// log.
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
        category: Option<&str>,
        mode: ExtractionMode,
    ) -> Result<RankedResults> {
        let candidates: Vec<&Source> = match category {
            Some(name) => {
                let category = self
                    .registry
                    .category(name)
                    .ok_or_else(|| SiftError::UnknownCategory(name.to_string()))?;
                ranker::select_by_category(category, self.registry.sources())
            }
            None => ranker::score_sources(
                query,
                self.registry.sources(),
                self.registry.keyword_mappings(),
            )
            .into_iter()
            .map(|(source, _)| source)
            .collect(),
        };

        let candidates: Vec<&Source> = candidates.into_iter().take(max_results).collect();
        debug!(query, candidates = candidates.len(), "Dispatching source extraction");

        let specs: Vec<JobSpec> = candidates
            .iter()
            .map(|source| JobSpec::new(&source.url).with_mode(mode))
            .collect();
        let results = self.scheduler.run_all(specs).await;

        let annotated: Vec<_> = results
            .into_iter()
            .filter(|result| result.is_success())
            .map(|result| {
                let relevance = ranker::score_content(&result.content, query);
                match candidates.iter().find(|s| s.url == result.url) {
                    Some(source) => result
                        .with_source(&source.name, source.priority)
                        .with_relevance(relevance),
                    None => result.with_relevance(relevance),
                }
            })
            .collect();

        Ok(RankedResults::from_unranked(annotated))
    }

    /// Searches every keyword of a category and merges the results.
    ///
    /// Fan-out is bounded: the first [`CATEGORY_KEYWORD_CAP`] keywords, and
    /// [`CATEGORY_RESULTS_PER_KEYWORD`] results per keyword. The merged list
    /// is deduplicated by URL and re-sorted by relevance.
    pub async fn search_by_category(
        &self,
        category_name: &str,
        mode: ExtractionMode,
    ) -> Result<RankedResults> {
        let category = self
            .registry
            .category(category_name)
            .ok_or_else(|| SiftError::UnknownCategory(category_name.to_string()))?;

        let keywords: Vec<String> = category
            .keywords
            .iter()
            .take(CATEGORY_KEYWORD_CAP)
            .cloned()
            .collect();

        let mut collected = Vec::new();
        for keyword in &keywords {
            info!(category = category_name, keyword = %keyword, "Searching category keyword");
            let ranked = self
                .search(
                    keyword,
                    CATEGORY_RESULTS_PER_KEYWORD,
                    Some(category_name),
                    mode,
                )
                .await?;
            collected.extend(ranked.into_vec());
        }

        Ok(RankedResults::from_unranked(collected))
    }
}
