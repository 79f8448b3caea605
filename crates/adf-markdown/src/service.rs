//! AdfService - the main entry point for converting between Markdown and
//! document trees

use std::fmt;

use serde_json::Value;

use adf_core::{Document, DOCUMENT_VERSION};

use crate::fallback;
use crate::options::WriterOptions;
use crate::parse::{CmarkConverter, MarkdownConverter};
use crate::serialize;

/// Convert Markdown to a document with the default converter.
///
/// Never fails: converter errors and blank input produce the paragraph
/// fallback instead.
pub fn markdown_to_doc(markdown: &str) -> Document {
    markdown_to_doc_with(&CmarkConverter::new(), markdown)
}

/// Convert Markdown to a document with the given converter, falling back to
/// one paragraph per blank-line separated chunk
pub fn markdown_to_doc_with(converter: &dyn MarkdownConverter, markdown: &str) -> Document {
    if markdown.trim().is_empty() {
        tracing::debug!("blank markdown input, using paragraph fallback");
        return fallback::paragraphs(markdown);
    }

    match converter.convert(markdown) {
        Ok(doc) if doc.version == DOCUMENT_VERSION => doc,
        Ok(doc) => {
            tracing::warn!(
                version = doc.version,
                "converter produced an unsupported document version, using paragraph fallback"
            );
            fallback::paragraphs(markdown)
        }
        Err(err) => {
            tracing::warn!(error = %err, "markdown conversion failed, using paragraph fallback");
            fallback::paragraphs(markdown)
        }
    }
}

/// Convert a document to Markdown with default options
pub fn doc_to_markdown(doc: &Document) -> String {
    serialize::serialize(doc, &WriterOptions::default())
}

/// Convert raw JSON to Markdown with default options; invalid documents
/// yield their plain text
pub fn value_to_markdown(value: &Value) -> String {
    serialize::serialize_value(value, &WriterOptions::default())
}

/// Conversion in both directions with shared settings
pub struct AdfService {
    options: WriterOptions,
    converter: Box<dyn MarkdownConverter>,
}

impl AdfService {
    /// Create an AdfService with default options and the CommonMark converter
    pub fn new() -> Self {
        Self::with_options(WriterOptions::default())
    }

    /// Create an AdfService with custom writer options
    pub fn with_options(options: WriterOptions) -> Self {
        Self {
            options,
            converter: Box::new(CmarkConverter::new()),
        }
    }

    /// Replace the Markdown converter
    pub fn with_converter<C>(mut self, converter: C) -> Self
    where
        C: MarkdownConverter + 'static,
    {
        self.converter = Box::new(converter);
        self
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut WriterOptions {
        &mut self.options
    }

    /// Convert Markdown to a document
    pub fn to_doc(&self, markdown: &str) -> Document {
        markdown_to_doc_with(self.converter.as_ref(), markdown)
    }

    /// Convert a document to Markdown
    pub fn to_markdown(&self, doc: &Document) -> String {
        serialize::serialize(doc, &self.options)
    }

    /// Convert raw JSON to Markdown
    pub fn value_to_markdown(&self, value: &Value) -> String {
        serialize::serialize_value(value, &self.options)
    }
}

impl Default for AdfService {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AdfService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdfService")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
