//! Naive body summarization.
//!
//! A word-budget truncation stands in for a model-backed summarizer; callers
//! that want real summaries can post-process `ExtractionResult.content`
//! themselves.

/// Upper bound on the input slice considered for a summary, in characters.
const SUMMARY_INPUT_CHARS: usize = 2000;

/// Summarizes `content` down to at most `max_words` words.
///
/// Only the first [`SUMMARY_INPUT_CHARS`] characters of the input are
/// considered. When the considered text already fits the word budget it is
/// returned unchanged; otherwise it is cut at the budget with a `...` suffix.
pub fn summarize(content: &str, max_words: usize) -> String {
    let considered: String = content.chars().take(SUMMARY_INPUT_CHARS).collect();
    let words: Vec<&str> = considered.split_whitespace().collect();

    if words.len() <= max_words {
        return considered;
    }

    let mut summary = words[..max_words].join(" ");
    summary.push_str("...");
    summary
}
