//! HTML content extraction.
//!
//! Converts raw fetched markup into structured `{title, body, word_count}`
//! using a DOM parser. The paragraph filter (minimum length, paragraph cap)
//! is the tunable policy that decides what counts as page content.

use scraper::{Html, Selector};

use crate::{Result, SiftError};

/// Paragraphs shorter than this many characters are treated as boilerplate.
pub const MIN_PARAGRAPH_CHARS: usize = 50;

/// At most this many paragraphs are kept per page.
pub const MAX_PARAGRAPHS: usize = 20;

/// Structured content extracted from a fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// Page title, or "Untitled" when the document has no `<title>`.
    pub title: String,
    /// Filtered paragraph text joined by blank lines.
    pub body: String,
    /// Whitespace-delimited word count of `body`.
    pub word_count: u32,
}

/// Extracts the title and main paragraph content from an HTML document.
///
/// Keeps `<p>` elements whose text exceeds [`MIN_PARAGRAPH_CHARS`], capped at
/// [`MAX_PARAGRAPHS`] paragraphs in document order.
pub fn extract_content(html: &str) -> Result<PageContent> {
    let document = Html::parse_document(html);

    let title_selector = Selector::parse("title")
        .map_err(|e| SiftError::Parse(format!("Failed to parse selector: {:?}", e)))?;
    let paragraph_selector = Selector::parse("p")
        .map_err(|e| SiftError::Parse(format!("Failed to parse selector: {:?}", e)))?;

    let title = document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled".to_string());

    let paragraphs: Vec<String> = document
        .select(&paragraph_selector)
        .map(|el| {
            el.text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
        .take(MAX_PARAGRAPHS)
        .collect();

    let body = paragraphs.join("\n\n");
    let word_count = body.split_whitespace().count() as u32;

    Ok(PageContent {
        title,
        body,
        word_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_PARA: &str =
        "hello world this paragraph is long enough to pass the fifty char filter yes";

    #[test]
    fn test_extract_title_and_body() {
        let html = format!("<html><head><title>A</title></head><body><p>{}</p></body></html>", LONG_PARA);
        let content = extract_content(&html).unwrap();
        assert_eq!(content.title, "A");
        assert_eq!(content.body, LONG_PARA);
        assert_eq!(content.word_count, LONG_PARA.split_whitespace().count() as u32);
    }

    #[test]
    fn test_extract_missing_title() {
        let html = format!("<html><body><p>{}</p></body></html>", LONG_PARA);
        let content = extract_content(&html).unwrap();
        assert_eq!(content.title, "Untitled");
    }

    #[test]
    fn test_extract_empty_title_falls_back() {
        let html = "<html><head><title>  </title></head><body></body></html>";
        let content = extract_content(html).unwrap();
        assert_eq!(content.title, "Untitled");
    }

    #[test]
    fn test_extract_filters_short_paragraphs() {
        let html = format!(
            "<html><body><p>too short</p><p>{}</p><p>also short</p></body></html>",
            LONG_PARA
        );
        let content = extract_content(&html).unwrap();
        assert_eq!(content.body, LONG_PARA);
    }

    #[test]
    fn test_extract_caps_paragraph_count() {
        let para = format!("<p>{}</p>", LONG_PARA);
        let html = format!("<html><body>{}</body></html>", para.repeat(30));
        let content = extract_content(&html).unwrap();
        assert_eq!(content.body.split("\n\n").count(), MAX_PARAGRAPHS);
    }

    #[test]
    fn test_extract_strips_nested_markup() {
        let html = format!(
            "<html><body><p>prefix <b>bold</b> {}</p></body></html>",
            LONG_PARA
        );
        let content = extract_content(&html).unwrap();
        assert!(content.body.starts_with("prefix bold"));
        assert!(!content.body.contains('<'));
    }

    #[test]
    fn test_extract_ignores_script_content() {
        let html = format!(
            "<html><head><script>var x = 'not content at all, really quite long enough';</script></head>\
             <body><p>{}</p></body></html>",
            LONG_PARA
        );
        let content = extract_content(&html).unwrap();
        assert_eq!(content.body, LONG_PARA);
    }

    #[test]
    fn test_extract_empty_document() {
        let content = extract_content("").unwrap();
        assert_eq!(content.title, "Untitled");
        assert_eq!(content.body, "");
        assert_eq!(content.word_count, 0);
    }

    #[test]
    fn test_extract_normalizes_whitespace() {
        let html = format!(
            "<html><body><p>  {}   \n\t with   trailing   spaces  </p></body></html>",
            LONG_PARA
        );
        let content = extract_content(&html).unwrap();
        assert!(!content.body.contains("  "));
    }
}
