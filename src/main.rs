//! pagesift CLI - concurrent web extraction and source-ranked search.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use pagesift::{
    DelaySpec, ExtractOptions, ExtractionMode, ExtractionScheduler, Extractor, JobSpec,
    RankedResults, Searcher, SourceRegistry,
};

/// pagesift - concurrent web extraction and source-ranked search CLI
#[derive(Parser)]
#[command(name = "pagesift")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract content from a list of URLs
    Extract(ExtractArgs),

    /// Search configured sources for a query
    Search(SearchArgs),
}

#[derive(Parser)]
struct ExtractArgs {
    /// Single URL to extract (can be used multiple times)
    #[arg(long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// File containing URLs (txt or json)
    #[arg(long = "urls", value_name = "FILE")]
    url_file: Option<PathBuf>,

    /// Extraction mode
    #[arg(long, default_value = "browser")]
    mode: ModeArg,

    /// Number of concurrent extractions
    #[arg(long, default_value_t = 3)]
    concurrency: usize,

    /// Delay between retries in seconds (e.g., "2" or "1-3")
    #[arg(long, default_value = "0")]
    delay: String,

    /// Number of attempts per URL
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Attach a truncation summary to each result
    #[arg(long)]
    summarize: bool,

    /// Summary length in words
    #[arg(long, default_value_t = 200)]
    summary_length: usize,

    /// Output format
    #[arg(long, default_value = "json")]
    format: FormatArg,

    /// Output file
    #[arg(long, default_value = "results.json")]
    output: PathBuf,

    /// Keep running after a URL fails instead of stopping early
    #[arg(long)]
    continue_on_error: bool,

    /// Log file for failed results
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

#[derive(Parser)]
struct SearchArgs {
    /// Search query
    query: Option<String>,

    /// Search within a category
    #[arg(long)]
    category: Option<String>,

    /// Maximum number of results
    #[arg(long, default_value_t = 10)]
    max_results: usize,

    /// Extraction mode
    #[arg(long, default_value = "browser")]
    mode: ModeArg,

    /// List all configured sources
    #[arg(long)]
    list_sources: bool,

    /// List all search categories
    #[arg(long)]
    list_categories: bool,

    /// Path to the sources config file
    #[arg(long, default_value = "sources.json")]
    sources: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Plain HTTP fetch
    Light,
    /// Headless-browser rendering
    Browser,
    /// Deep crawl (currently served by browser rendering)
    Deep,
}

impl From<ModeArg> for ExtractionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Light => ExtractionMode::Light,
            ModeArg::Browser => ExtractionMode::Browser,
            ModeArg::Deep => ExtractionMode::Deep,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Pretty-printed JSON array
    Json,
    /// One Markdown section per result
    Markdown,
    /// Fixed-column CSV
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Extract(args) => run_extract(args).await,
        Commands::Search(args) => run_search(args).await,
    }
}

async fn run_extract(args: ExtractArgs) -> Result<()> {
    let specs: Vec<JobSpec> = if let Some(file) = &args.url_file {
        pagesift::load_specs(file)?
    } else if !args.urls.is_empty() {
        args.urls.iter().cloned().map(JobSpec::new).collect()
    } else {
        anyhow::bail!("Must provide --url or --urls");
    };

    let delay: DelaySpec = args.delay.parse()?;
    let options = ExtractOptions {
        mode: args.mode.into(),
        retries: args.retries,
        delay,
        summarize: args.summarize,
        summary_words: args.summary_length,
    };

    println!(
        "Extracting {} URLs (mode: {}, concurrency: {}, delay: {}s)",
        specs.len(),
        options.mode,
        args.concurrency,
        args.delay
    );

    let extractor = Arc::new(Extractor::new(options));
    let mut scheduler = ExtractionScheduler::new(extractor, args.concurrency)
        .stop_on_first_error(!args.continue_on_error);
    if let Some(log) = &args.log {
        scheduler = scheduler.with_error_log(log);
    }

    let results = scheduler.run_all(specs).await;

    match args.format {
        FormatArg::Json => pagesift::write_json(&results, &args.output)?,
        FormatArg::Markdown => pagesift::write_markdown(&results, &args.output)?,
        FormatArg::Csv => pagesift::write_csv(&results, &args.output)?,
    }

    let succeeded = results.iter().filter(|r| r.is_success()).count();
    println!("\nExtraction complete");
    println!("  Total: {}", results.len());
    println!("  Successful: {}", succeeded);
    println!("  Failed: {}", results.len() - succeeded);
    println!("  Output: {}", args.output.display());

    Ok(())
}

async fn run_search(args: SearchArgs) -> Result<()> {
    let registry = SourceRegistry::load(&args.sources)?;

    if args.list_sources {
        list_sources(&registry);
        return Ok(());
    }
    if args.list_categories {
        list_categories(&registry);
        return Ok(());
    }

    let mode: ExtractionMode = args.mode.into();
    let options = ExtractOptions {
        mode,
        ..Default::default()
    };
    let extractor = Arc::new(Extractor::new(options));
    let scheduler = ExtractionScheduler::new(extractor, 3);
    let searcher = Searcher::new(registry, scheduler);

    let ranked = match (&args.query, &args.category) {
        (Some(query), category) => {
            searcher
                .search(query, args.max_results, category.as_deref(), mode)
                .await?
        }
        (None, Some(category)) => searcher.search_by_category(category, mode).await?,
        (None, None) => {
            anyhow::bail!(
                "Must provide a query, --category, --list-sources or --list-categories"
            );
        }
    };

    print_results(&ranked, args.max_results);
    Ok(())
}

fn list_sources(registry: &SourceRegistry) {
    println!("\nConfigured sources:\n");
    for source in registry.sources() {
        println!("  {} (priority {})", source.name, source.priority);
        println!("    URL: {}", source.url);
        if !source.keywords.is_empty() {
            println!("    Keywords: {}", source.keywords.join(", "));
        }
        println!();
    }
}

fn list_categories(registry: &SourceRegistry) {
    println!("\nSearch categories:\n");
    for (name, category) in registry.categories() {
        println!("  {}", name);
        if !category.keywords.is_empty() {
            println!("    Keywords: {}", category.keywords.join(", "));
        }
        if !category.sources.is_empty() {
            println!("    Sources: {}", category.sources.join(", "));
        }
        println!();
    }
}

fn print_results(results: &RankedResults, max_results: usize) {
    println!("\nFound {} results\n", results.len());

    for (i, result) in results.items().iter().take(max_results).enumerate() {
        println!("#{} {}", i + 1, result.title);
        if let Some(source) = &result.source_name {
            println!("   Source: {}", source);
        }
        println!("   Relevance: {:.1}%", result.relevance() * 100.0);
        println!("   URL: {}", result.url);

        if let Some(summary) = &result.summary {
            println!("   Summary: {}", summary);
        } else if !result.content.is_empty() {
            let preview: String = result.content.chars().take(500).collect();
            let ellipsis = if result.content.chars().count() > 500 {
                "..."
            } else {
                ""
            };
            println!("   Preview: {}{}", preview, ellipsis);
        }

        println!(
            "   Extracted: {} ({} words)",
            result.extraction_time, result.word_count
        );
        println!();
    }

    println!(
        "Showing {} of {} results",
        results.len().min(max_results),
        results.len()
    );
}
