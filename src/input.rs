//! URL list loading.
//!
//! Accepts either a line-delimited text file (one URL per line) or a JSON
//! document: an array of URL strings / `{url, mode?}` objects, or an object
//! wrapping such an array under a `urls` key.

use std::path::Path;

use serde_json::Value;

use crate::job::{ExtractionMode, JobSpec};
use crate::{Result, SiftError};

/// Loads job specs from a URL list file.
///
/// Files with a `.json` extension are parsed as JSON; anything else is
/// treated as plain text. Malformed JSON, an unrecognized top-level shape or
/// an entry that is not an absolute URL is a fatal load error.
pub fn load_specs(path: impl AsRef<Path>) -> Result<Vec<JobSpec>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| {
        SiftError::Config(format!("Cannot read URL file {}: {}", path.display(), e))
    })?;

    let parsed = if path.extension().is_some_and(|ext| ext == "json") {
        parse_json_specs(&raw)
    } else {
        parse_text_specs(&raw)
    };
    parsed.map_err(|e| SiftError::Config(format!("Invalid URL file {}: {}", path.display(), e)))
}

fn parse_text_specs(raw: &str) -> Result<Vec<JobSpec>> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            url::Url::parse(line)?;
            Ok(JobSpec::new(line))
        })
        .collect()
}

fn parse_json_specs(raw: &str) -> Result<Vec<JobSpec>> {
    let value: Value = serde_json::from_str(raw)?;

    let entries = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("urls") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(SiftError::Parse(
                    "expected an array or an object with a \"urls\" array".to_string(),
                ))
            }
        },
        _ => {
            return Err(SiftError::Parse(
                "expected an array or an object with a \"urls\" array".to_string(),
            ))
        }
    };

    entries.into_iter().map(spec_from_entry).collect()
}

fn spec_from_entry(entry: Value) -> Result<JobSpec> {
    match entry {
        Value::String(url) => {
            url::Url::parse(&url)?;
            Ok(JobSpec::new(url))
        }
        Value::Object(map) => {
            let url = map
                .get("url")
                .and_then(Value::as_str)
                .ok_or_else(|| SiftError::Parse("URL entry is missing \"url\"".to_string()))?;
            url::Url::parse(url)?;
            let mode = match map.get("mode").and_then(Value::as_str) {
                Some(mode) => Some(mode.parse::<ExtractionMode>()?),
                None => None,
            };
            Ok(JobSpec {
                url: url.to_string(),
                mode,
            })
        }
        other => Err(SiftError::Parse(format!(
            "unsupported URL entry: {}",
            other
        ))),
    }
}
