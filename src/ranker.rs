//! Keyword relevance scoring.
//!
//! Pure functions over the read-only registry, safe to call from any number
//! of concurrent jobs.

use std::collections::BTreeMap;

use crate::registry::{SearchCategory, Source};

/// Scores sources against a query and returns the matches, best first.
///
/// Each query token scores 1 per source keyword containing it (substring,
/// case-insensitive). Each synonym mapping whose synonyms appear in the query
/// scores 2 per source keyword containing one of its synonyms. The sum is
/// multiplied by `11 - priority` so lower priority numbers weigh more.
/// Sources scoring 0 are dropped; ties keep the registry's order.
pub fn score_sources<'a>(
    query: &str,
    sources: &'a [Source],
    mappings: &BTreeMap<String, Vec<String>>,
) -> Vec<(&'a Source, u32)> {
    let query_lower = query.to_lowercase();
    let tokens: Vec<&str> = query_lower.split_whitespace().collect();

    let mut scored = Vec::new();

    for source in sources {
        let keywords_lower: Vec<String> =
            source.keywords.iter().map(|k| k.to_lowercase()).collect();

        let mut score: u32 = 0;

        for token in &tokens {
            score += keywords_lower.iter().filter(|k| k.contains(token)).count() as u32;
        }

        for synonyms in mappings.values() {
            let synonyms_lower: Vec<String> =
                synonyms.iter().map(|s| s.to_lowercase()).collect();
            if !synonyms_lower.iter().any(|syn| query_lower.contains(syn)) {
                continue;
            }
            let matching = keywords_lower
                .iter()
                .filter(|k| synonyms_lower.iter().any(|syn| k.contains(syn)))
                .count() as u32;
            score += 2 * matching;
        }

        score *= priority_factor(source.priority);

        if score > 0 {
            scored.push((source, score));
        }
    }

    // Stable sort: equal scores keep registry order.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
}

/// Fraction of query tokens appearing anywhere in `content`, in [0, 1].
///
/// Matching is case-insensitive substring containment; an empty query scores
/// 0.0. Deterministic for fixed inputs.
pub fn score_content(content: &str, query: &str) -> f64 {
    let content_lower = content.to_lowercase();
    let query_lower = query.to_lowercase();
    let tokens: Vec<&str> = query_lower.split_whitespace().collect();

    if tokens.is_empty() {
        return 0.0;
    }

    let matches = tokens
        .iter()
        .filter(|token| content_lower.contains(**token))
        .count();

    matches as f64 / tokens.len() as f64
}

/// Sources belonging to a category, in the category's declared member order.
///
/// Membership is matched by name, case-insensitively.
pub fn select_by_category<'a>(
    category: &SearchCategory,
    sources: &'a [Source],
) -> Vec<&'a Source> {
    category
        .sources
        .iter()
        .filter_map(|member| {
            sources
                .iter()
                .find(|source| source.name.eq_ignore_ascii_case(member))
        })
        .collect()
}

fn priority_factor(priority: u8) -> u32 {
    11u32.saturating_sub(u32::from(priority.clamp(1, 10)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, priority: u8, keywords: &[&str]) -> Source {
        Source {
            name: name.to_string(),
            url: format!("https://{}.test", name.to_lowercase().replace(' ', "-")),
            priority,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            categories: Vec::new(),
        }
    }

    fn no_mappings() -> BTreeMap<String, Vec<String>> {
        BTreeMap::new()
    }

    #[test]
    fn test_score_sources_counts_token_matches() {
        let sources = vec![source("A", 1, &["gpt", "model"])];
        let scored = score_sources("gpt model release", &sources, &no_mappings());
        // 2 matches * (11 - 1)
        assert_eq!(scored[0].1, 20);
    }

    #[test]
    fn test_score_sources_priority_ordering() {
        let sources = vec![
            source("Low", 5, &["release"]),
            source("High", 1, &["gpt", "model"]),
        ];
        let scored = score_sources("gpt model release", &sources, &no_mappings());
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].0.name, "High");
        assert_eq!(scored[0].1, 20);
        assert_eq!(scored[1].0.name, "Low");
        assert_eq!(scored[1].1, 6);
    }

    #[test]
    fn test_score_sources_excludes_zero_scores() {
        let sources = vec![source("Unrelated", 1, &["cooking"])];
        let scored = score_sources("gpt model", &sources, &no_mappings());
        assert!(scored.is_empty());
    }

    #[test]
    fn test_score_sources_token_is_substring_of_keyword() {
        let sources = vec![source("A", 1, &["gpt-4 benchmarks"])];
        let scored = score_sources("gpt", &sources, &no_mappings());
        assert_eq!(scored[0].1, 10);
    }

    #[test]
    fn test_score_sources_case_insensitive() {
        let sources = vec![source("A", 1, &["GPT", "Model"])];
        let scored = score_sources("gPt MODEL", &sources, &no_mappings());
        assert_eq!(scored[0].1, 20);
    }

    #[test]
    fn test_score_sources_synonym_mapping_bonus() {
        let sources = vec![source("A", 1, &["gpt", "language model news"])];
        let mut mappings = BTreeMap::new();
        mappings.insert(
            "llm".to_string(),
            vec!["gpt".to_string(), "language model".to_string()],
        );

        // Token "gpt" matches keyword "gpt" (+1); the mapping is active
        // (query contains "gpt") and both keywords contain a synonym (+2*2).
        let scored = score_sources("gpt", &sources, &mappings);
        assert_eq!(scored[0].1, (1 + 4) * 10);
    }

    #[test]
    fn test_score_sources_inactive_mapping_adds_nothing() {
        let sources = vec![source("A", 1, &["gpt"])];
        let mut mappings = BTreeMap::new();
        mappings.insert("vision".to_string(), vec!["image".to_string()]);

        let scored = score_sources("gpt", &sources, &mappings);
        assert_eq!(scored[0].1, 10);
    }

    #[test]
    fn test_score_sources_ties_keep_registry_order() {
        let sources = vec![
            source("First", 3, &["rust"]),
            source("Second", 3, &["rust"]),
        ];
        let scored = score_sources("rust", &sources, &no_mappings());
        assert_eq!(scored[0].0.name, "First");
        assert_eq!(scored[1].0.name, "Second");
        assert_eq!(scored[0].1, scored[1].1);
    }

    #[test]
    fn test_score_sources_priority_clamped() {
        let sources = vec![source("Wild", 200, &["rust"])];
        // Clamped to priority 10 -> factor 1.
        let scored = score_sources("rust", &sources, &no_mappings());
        assert_eq!(scored[0].1, 1);
    }

    #[test]
    fn test_score_content_full_match() {
        assert_eq!(score_content("the gpt model shipped", "gpt model"), 1.0);
    }

    #[test]
    fn test_score_content_partial_match() {
        assert_eq!(score_content("the gpt paper", "gpt model"), 0.5);
    }

    #[test]
    fn test_score_content_no_match() {
        assert_eq!(score_content("cooking recipes", "gpt model"), 0.0);
    }

    #[test]
    fn test_score_content_empty_query() {
        assert_eq!(score_content("anything", ""), 0.0);
        assert_eq!(score_content("anything", "   "), 0.0);
    }

    #[test]
    fn test_score_content_case_invariant() {
        let lower = score_content("the gpt model shipped", "gpt model");
        let upper = score_content("THE GPT MODEL SHIPPED", "GPT MODEL");
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_score_content_deterministic() {
        let a = score_content("body text here", "body text");
        let b = score_content("body text here", "body text");
        assert_eq!(a, b);
    }

    #[test]
    fn test_select_by_category_follows_member_order() {
        let sources = vec![
            source("Alpha", 1, &[]),
            source("Beta", 2, &[]),
            source("Gamma", 3, &[]),
        ];
        let category = SearchCategory {
            keywords: Vec::new(),
            sources: vec!["gamma".to_string(), "ALPHA".to_string()],
        };

        let selected = select_by_category(&category, &sources);
        let names: Vec<&str> = selected.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "Alpha"]);
    }

    #[test]
    fn test_select_by_category_ignores_unknown_members() {
        let sources = vec![source("Alpha", 1, &[])];
        let category = SearchCategory {
            keywords: Vec::new(),
            sources: vec!["alpha".to_string(), "missing".to_string()],
        };

        let selected = select_by_category(&category, &sources);
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_select_by_category_empty_member_list() {
        let sources = vec![source("Alpha", 1, &[])];
        let category = SearchCategory {
            keywords: vec!["kw".to_string()],
            sources: Vec::new(),
        };
        assert!(select_by_category(&category, &sources).is_empty());
    }
}
