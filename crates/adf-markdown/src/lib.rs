//! # adf-markdown
//!
//! Convert between Markdown and ADF-style document trees.
//!
//! ## Design
//!
//! Both directions are total at the top level:
//!
//! - **Markdown → document** goes through a [`MarkdownConverter`] (by default
//!   [`CmarkConverter`], built on `pulldown-cmark`). If the converter fails,
//!   the text is split into plain paragraphs instead.
//! - **Document → Markdown** renders every known node kind and recurses
//!   through unknown ones. If rendering fails, the document's plain text is
//!   returned.
//!
//! The lower-level [`render`] and [`MarkdownConverter::convert`] report
//! errors instead of recovering.
//!
//! ## Example
//!
//! ```rust
//! use adf_markdown::{doc_to_markdown, markdown_to_doc};
//!
//! let doc = markdown_to_doc("# Title\n\nHello **world**");
//! assert_eq!(doc.content.len(), 2);
//!
//! let markdown = doc_to_markdown(&doc);
//! assert_eq!(markdown, "# Title\n\nHello **world**");
//! ```
//!
//! ## Example (service)
//!
//! ```rust
//! use adf_markdown::{AdfService, WriterOptions};
//!
//! let service = AdfService::with_options(WriterOptions {
//!     bullet_list_marker: '*',
//!     ..WriterOptions::default()
//! });
//! let doc = service.to_doc("- one\n- two");
//! assert_eq!(service.to_markdown(&doc), "* one\n* two");
//! ```

pub mod fallback;
mod options;
mod parse;
pub mod serialize;
mod service;

pub use adf_core::{AdfError, Document, Result};
pub use options::{ParseOptions, WriterOptions};
pub use parse::{CmarkConverter, MarkdownConverter};
pub use serialize::{escape_markdown, render};
pub use service::{
    doc_to_markdown, markdown_to_doc, markdown_to_doc_with, value_to_markdown, AdfService,
};
