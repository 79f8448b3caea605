//! Heading lookup and section editing
//!
//! A section is a heading plus every following node up to, but excluding, the
//! next heading whose level is the same or shallower. Only the heading level is
//! used as the nesting signal, so an outline that skips levels (an `h3` right
//! after an `h1`) still nests under the nearest shallower heading.
//!
//! All editing operations borrow their input and return a new node sequence.

use std::ops::Range;

use crate::ast::{Document, Node};

/// One heading in a flat node sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingInfo {
    pub index: usize,
    pub level: u8,
    pub text: String,
}

/// Result of splitting a node sequence around a section
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SectionSplit {
    /// The heading and its body; empty when the heading was not found
    pub section: Vec<Node>,
    /// Everything else, in original order
    pub remaining: Vec<Node>,
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn matches_heading(node: &Node, wanted: &str) -> bool {
    node.is_heading() && normalize(&heading_text(node)) == wanted
}

/// Literal text of a heading, marks ignored
pub fn heading_text(node: &Node) -> String {
    node.plain_text()
}

/// Level of a heading node (1 when `attrs.level` is missing)
pub fn heading_level(node: &Node) -> u8 {
    node.level()
}

/// Index of the first heading whose text matches `text`, ignoring case and
/// surrounding whitespace
pub fn find_heading(nodes: &[Node], text: &str) -> Option<usize> {
    let wanted = normalize(text);
    nodes.iter().position(|node| matches_heading(node, &wanted))
}

/// Number of headings matching `text`; more than one means section edits
/// will only touch the first
pub fn count_headings(nodes: &[Node], text: &str) -> usize {
    let wanted = normalize(text);
    nodes
        .iter()
        .filter(|node| matches_heading(node, &wanted))
        .count()
}

/// Outline of every top-level heading
pub fn list_headings(nodes: &[Node]) -> Vec<HeadingInfo> {
    nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.is_heading())
        .map(|(index, node)| HeadingInfo {
            index,
            level: heading_level(node),
            text: heading_text(node).trim().to_string(),
        })
        .collect()
}

/// End (exclusive) of the section starting at `start`: the index of the next
/// heading with a level at or above the start heading's level, or
/// `nodes.len()` when there is none
pub fn section_end(nodes: &[Node], start: usize) -> usize {
    let Some(first) = nodes.get(start) else {
        return nodes.len();
    };
    let level = heading_level(first);

    nodes
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, node)| node.is_heading() && heading_level(node) <= level)
        .map(|(index, _)| index)
        .unwrap_or(nodes.len())
}

/// Index range of the section under `heading`
pub fn locate_section(nodes: &[Node], heading: &str) -> Option<Range<usize>> {
    let start = find_heading(nodes, heading)?;
    Some(start..section_end(nodes, start))
}

/// Split `nodes` into the section under `heading` and everything else
pub fn extract_section(nodes: &[Node], heading: &str) -> SectionSplit {
    match locate_section(nodes, heading) {
        Some(range) => {
            let mut remaining = Vec::with_capacity(nodes.len() - range.len());
            remaining.extend_from_slice(&nodes[..range.start]);
            remaining.extend_from_slice(&nodes[range.end..]);
            SectionSplit {
                section: nodes[range].to_vec(),
                remaining,
            }
        }
        None => {
            tracing::debug!(heading, "section not found, nothing extracted");
            SectionSplit {
                section: Vec::new(),
                remaining: nodes.to_vec(),
            }
        }
    }
}

/// Copy of `nodes` without the section under `heading`
pub fn remove_section(nodes: &[Node], heading: &str) -> Vec<Node> {
    extract_section(nodes, heading).remaining
}

/// Insert `new_nodes` as trailing content of the section under `heading`.
///
/// When the heading is missing the nodes go to the end of the sequence; no
/// heading is synthesized for them.
pub fn append_to_section(nodes: &[Node], heading: &str, new_nodes: Vec<Node>) -> Vec<Node> {
    let at = match locate_section(nodes, heading) {
        Some(range) => range.end,
        None => {
            tracing::debug!(heading, "section not found, appending at end");
            nodes.len()
        }
    };
    splice(nodes, at..at, new_nodes)
}

/// Swap the section under `heading` for `new_section`.
///
/// `new_section` replaces the heading too, so callers normally include a
/// heading node in it. When the heading is missing the nodes go to the end.
pub fn replace_section(nodes: &[Node], heading: &str, new_section: Vec<Node>) -> Vec<Node> {
    let range = locate_section(nodes, heading).unwrap_or_else(|| {
        tracing::debug!(heading, "section not found, appending replacement at end");
        nodes.len()..nodes.len()
    });
    splice(nodes, range, new_section)
}

fn splice(nodes: &[Node], range: Range<usize>, insert: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len() - range.len() + insert.len());
    out.extend_from_slice(&nodes[..range.start]);
    out.extend(insert);
    out.extend_from_slice(&nodes[range.end..]);
    out
}

impl Document {
    /// Split the document content around the section under `heading`
    pub fn extract_section(&self, heading: &str) -> SectionSplit {
        extract_section(&self.content, heading)
    }

    pub fn remove_section(&self, heading: &str) -> Document {
        Document::new(remove_section(&self.content, heading))
    }

    pub fn append_to_section(&self, heading: &str, new_nodes: Vec<Node>) -> Document {
        Document::new(append_to_section(&self.content, heading, new_nodes))
    }

    pub fn replace_section(&self, heading: &str, new_section: Vec<Node>) -> Document {
        Document::new(replace_section(&self.content, heading, new_section))
    }
}
