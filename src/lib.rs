//! # pagesift
//!
//! Concurrent web page extraction and source-ranked search.
//!
//! This library fetches a set of URLs under a concurrency cap, retries
//! failed fetches with jittered delays, extracts structured content from the
//! fetched HTML, and can rank configured sources and fetched documents
//! against a query:
//!
//! - Bounded-concurrency scheduling with per-job retry budgets
//! - Light (HTTP) and browser (headless rendering) fetch modes with a
//!   documented fallback chain
//! - Keyword relevance scoring and URL-deduplicated ranked result sets
//! - JSON, Markdown and CSV result encodings
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pagesift::{ExtractOptions, ExtractionScheduler, Extractor, JobSpec};
//!
//! #[tokio::main]
//! async fn main() {
//!     let extractor = Arc::new(Extractor::new(ExtractOptions::default()));
//!     let scheduler = ExtractionScheduler::new(extractor, 3);
//!
//!     let specs = vec![JobSpec::new("https://example.com")];
//!     for result in scheduler.run_all(specs).await {
//!         println!("{}: {:?}", result.url, result.status);
//!     }
//! }
//! ```

mod content;
mod error;
mod fetcher;
mod fetcher_http;
mod input;
mod job;
mod output;
mod ranker;
mod registry;
mod result;
mod scheduler;
mod search;
mod summary;

#[cfg(feature = "headless")]
pub mod browser;

pub use content::{extract_content, PageContent, MAX_PARAGRAPHS, MIN_PARAGRAPH_CHARS};
pub use error::{Result, SiftError};
pub use fetcher::PageFetcher;
pub use fetcher_http::HttpFetcher;
pub use input::load_specs;
pub use job::{DelaySpec, ExtractOptions, ExtractionMode, Extractor, JobSpec};
pub use output::{write_csv, write_json, write_markdown};
pub use ranker::{score_content, score_sources, select_by_category};
pub use registry::{SearchCategory, Source, SourceRegistry};
pub use result::{ExtractionResult, ExtractionStatus, RankedResults};
pub use scheduler::ExtractionScheduler;
pub use search::Searcher;
pub use summary::summarize;
