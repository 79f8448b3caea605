//! Link and plain-text extraction

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::ast::{Document, MarkKind, Node};
use crate::traverse::{traverse, Visit};

/// URL-shaped runs inside plain text
static URL_IN_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"'`]+"#).expect("valid URL regex"));

static FIGMA_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:[\w-]+\.)?figma\.com/(?:file|design|proto|board)/")
        .expect("valid Figma regex")
});

static CONFLUENCE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[\w-]+\.atlassian\.net/wiki/").expect("valid Confluence regex")
});

static GOOGLE_DOCS_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://docs\.google\.com/(?:document|spreadsheets|presentation)/d/")
        .expect("valid Google Docs regex")
});

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '>', '\'', '"'];

/// What a candidate URL has to match to be collected
#[derive(Debug, Clone)]
pub enum UrlPattern {
    /// The URL contains this text
    Substring(String),
    /// The URL matches this expression
    Regex(Regex),
}

impl UrlPattern {
    pub fn substring(text: &str) -> Self {
        UrlPattern::Substring(text.to_string())
    }

    pub fn matches(&self, url: &str) -> bool {
        match self {
            UrlPattern::Substring(text) => url.contains(text.as_str()),
            UrlPattern::Regex(regex) => regex.is_match(url),
        }
    }
}

impl From<Regex> for UrlPattern {
    fn from(regex: Regex) -> Self {
        UrlPattern::Regex(regex)
    }
}

impl From<&str> for UrlPattern {
    fn from(text: &str) -> Self {
        UrlPattern::substring(text)
    }
}

/// Options for URL extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Also scan literal text for bare URLs
    pub include_plain_text: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            include_plain_text: true,
        }
    }
}

/// Strip punctuation that commonly trails a URL in prose
pub fn trim_url(url: &str) -> &str {
    url.trim().trim_end_matches(TRAILING_PUNCTUATION)
}

/// Collect the URLs in `doc` that match `pattern`.
///
/// Sources, in document order: card nodes with a `url` attribute, text with a
/// link mark, and (unless disabled) bare URLs in literal text. The result is
/// deduplicated, keeping first occurrences.
pub fn extract_urls(doc: &Document, pattern: &UrlPattern, options: &ExtractOptions) -> Vec<String> {
    let mut found: IndexSet<String> = IndexSet::new();
    let mut consider = |candidate: &str| {
        let url = trim_url(candidate);
        if !url.is_empty() && pattern.matches(url) {
            found.insert(url.to_string());
        }
    };

    traverse(&doc.content, |node, _, _| {
        if node.kind.is_card() {
            if let Some(url) = node.attr_str("url") {
                consider(url);
            }
        }

        if node.is_text() {
            for mark in node.marks().iter().filter(|m| m.kind == MarkKind::Link) {
                if let Some(href) = mark.attr_str("href") {
                    consider(href);
                }
            }
            if options.include_plain_text {
                if let Some(text) = node.text.as_deref() {
                    for m in URL_IN_TEXT.find_iter(text) {
                        consider(m.as_str());
                    }
                }
            }
        }

        Visit::Continue
    });

    found.into_iter().collect()
}

/// Figma file, design, prototype and board links
pub fn extract_figma_urls(doc: &Document) -> Vec<String> {
    extract_urls(
        doc,
        &UrlPattern::Regex(Regex::clone(&FIGMA_URL)),
        &ExtractOptions::default(),
    )
}

/// Confluence page links on Atlassian cloud sites
pub fn extract_confluence_urls(doc: &Document) -> Vec<String> {
    extract_urls(
        doc,
        &UrlPattern::Regex(Regex::clone(&CONFLUENCE_URL)),
        &ExtractOptions::default(),
    )
}

/// Google Docs, Sheets and Slides links
pub fn extract_google_docs_urls(doc: &Document) -> Vec<String> {
    extract_urls(
        doc,
        &UrlPattern::Regex(Regex::clone(&GOOGLE_DOCS_URL)),
        &ExtractOptions::default(),
    )
}

/// All literal text in the document joined with single spaces.
///
/// Unlike [`traverse`], the walk keeps its own stack and has no depth limit,
/// so it still recovers the text of trees too deep to render.
pub fn collect_text(doc: &Document) -> String {
    collect_node_text(&doc.content)
}

pub fn collect_node_text(nodes: &[Node]) -> String {
    let mut parts = Vec::new();
    let mut stack = vec![nodes.iter()];

    while let Some(siblings) = stack.last_mut() {
        let Some(node) = siblings.next() else {
            stack.pop();
            continue;
        };
        if let Some(text) = node.text.as_deref().filter(|_| node.is_text()) {
            parts.push(text);
        }
        if !node.children().is_empty() {
            stack.push(node.children().iter());
        }
    }

    parts.join(" ")
}

/// Text extraction over raw JSON that may not be a well-formed document
pub fn collect_text_from_value(value: &Value) -> String {
    let mut parts = Vec::new();
    let mut pending = vec![value];

    while let Some(value) = pending.pop() {
        match value {
            Value::Object(map) => {
                if map.get("type").and_then(Value::as_str) == Some("text") {
                    if let Some(text) = map.get("text").and_then(Value::as_str) {
                        parts.push(text);
                    }
                }
                if let Some(content) = map.get("content") {
                    pending.push(content);
                }
            }
            // Reversed so items come off the stack in document order
            Value::Array(items) => pending.extend(items.iter().rev()),
            _ => {}
        }
    }

    parts.join(" ")
}
