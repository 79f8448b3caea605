//! Deterministic paragraph-split conversion used when the Markdown converter
//! fails or has nothing to work with

use once_cell::sync::Lazy;
use regex::Regex;

use adf_core::{Document, Node};

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t\r]*\n").expect("valid blank line regex"));

/// One paragraph per blank-line separated chunk.
///
/// Line breaks inside a chunk become `hardBreak` nodes. Input without any
/// non-blank chunk yields a single empty paragraph.
pub fn paragraphs(markdown: &str) -> Document {
    let content: Vec<Node> = BLANK_LINES
        .split(markdown)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(chunk_paragraph)
        .collect();

    if content.is_empty() {
        Document::new(vec![Node::paragraph(Vec::new())])
    } else {
        Document::new(content)
    }
}

fn chunk_paragraph(chunk: &str) -> Node {
    let mut inlines = Vec::new();
    for (i, line) in chunk.lines().enumerate() {
        if i > 0 {
            inlines.push(Node::hard_break());
        }
        inlines.push(Node::text(line));
    }
    Node::paragraph(inlines)
}
