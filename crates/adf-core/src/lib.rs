//! adf-core - document tree model and structural editing
//!
//! This crate provides the document tree used for issue descriptions and
//! comments (`{ version: 1, type: "doc", content: [...] }`) together with the
//! operations that work on it without any knowledge of Markdown:
//!
//! - [`ast`]: the node model and the top-level validity check
//! - [`traverse`]: depth-first visiting and bottom-up rewriting
//! - [`section`]: heading lookup and section extract/remove/append/replace
//! - [`extract`]: URL and plain-text extraction
//!
//! Every operation borrows its input and returns a new value.
//!
//! # Example
//!
//! ```rust
//! use adf_core::{extract_section, Document, Node};
//!
//! let doc = Document::new(vec![
//!     Node::heading(2, "Shell Stories"),
//!     Node::paragraph(vec![Node::text("As a user...")]),
//!     Node::heading(2, "Other"),
//! ]);
//!
//! let split = extract_section(&doc.content, "shell stories");
//! assert_eq!(split.section.len(), 2);
//! assert_eq!(split.remaining.len(), 1);
//! ```

pub mod ast;
mod error;
pub mod extract;
pub mod section;
pub mod traverse;

pub use ast::{is_valid_document, Attrs, Document, Mark, MarkKind, Node, NodeKind, DOCUMENT_VERSION};
pub use error::{AdfError, Result};
pub use extract::{
    collect_node_text, collect_text, collect_text_from_value, extract_confluence_urls,
    extract_figma_urls, extract_google_docs_urls, extract_urls, trim_url, ExtractOptions,
    UrlPattern,
};
pub use section::{
    append_to_section, count_headings, extract_section, find_heading, heading_level,
    heading_text, list_headings, locate_section, remove_section, replace_section, section_end,
    HeadingInfo, SectionSplit,
};
pub use traverse::{count, find, transform, traverse, Rewrite, Visit, MAX_DEPTH};
