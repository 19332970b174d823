//! Result serialization in the supported output encodings.

use std::fmt::Write as _;
use std::path::Path;

use crate::result::ExtractionResult;
use crate::Result;

/// Writes results as a pretty-printed JSON array.
pub fn write_json(results: &[ExtractionResult], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Writes results as Markdown, one section per result.
///
/// Failed results render an error block instead of a content section.
pub fn write_markdown(results: &[ExtractionResult], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut out = String::new();
    for result in results {
        if !result.is_success() {
            let _ = writeln!(out, "# Extraction failed\n");
            let _ = writeln!(out, "**URL**: {}", result.url);
            let _ = writeln!(
                out,
                "**Error**: {}\n",
                result.error.as_deref().unwrap_or("Unknown")
            );
            let _ = writeln!(out, "---\n");
            continue;
        }

        let _ = writeln!(out, "# {}\n", result.title);
        let _ = writeln!(out, "**URL**: {}", result.url);
        let _ = writeln!(out, "**Extracted**: {}", result.extraction_time);
        let _ = writeln!(out, "**Words**: {}", result.word_count);

        if let Some(summary) = &result.summary {
            let _ = writeln!(out, "\n## Summary\n\n{}", summary);
        }

        let _ = writeln!(out, "\n## Content\n\n{}\n", result.content);
        let _ = writeln!(out, "---\n");
    }

    std::fs::write(path, out)?;
    Ok(())
}

/// Writes results as CSV with a fixed column order.
pub fn write_csv(results: &[ExtractionResult], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut writer = csv::WriterBuilder::new().from_path(path)?;
    writer.write_record([
        "url",
        "title",
        "summary",
        "word_count",
        "extraction_time",
        "extraction_mode",
        "status",
    ])?;

    for result in results {
        let word_count = result.word_count.to_string();
        let mode = result.extraction_mode.to_string();
        let status = if result.is_success() { "success" } else { "failed" };
        writer.write_record([
            result.url.as_str(),
            result.title.as_str(),
            result.summary.as_deref().unwrap_or(""),
            word_count.as_str(),
            result.extraction_time.as_str(),
            mode.as_str(),
            status,
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
