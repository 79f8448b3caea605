//! Configuration options for Markdown conversion in both directions

/// Options for document → Markdown serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// Bullet list marker
    pub bullet_list_marker: char,

    /// Spaces of indentation per list nesting level
    pub list_indent: usize,

    /// Indent item content to the width of its marker (`1. ` → 3 spaces)
    /// instead of `list_indent`
    pub indent_to_marker: bool,

    /// Fence string for code blocks
    pub fence: String,

    /// Horizontal rule string
    pub hr: String,

    /// Strong delimiter
    pub strong_delimiter: String,

    /// Emphasis delimiter
    pub em_delimiter: char,

    /// Strikethrough delimiter
    pub strike_delimiter: String,

    /// Opening and closing tokens for underlined text
    pub underline_delimiters: (String, String),

    /// Backslash-escape Markdown punctuation in plain text
    pub escape_text: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            bullet_list_marker: '-',
            list_indent: 2,
            indent_to_marker: false,
            fence: "```".to_string(),
            hr: "---".to_string(),
            strong_delimiter: "**".to_string(),
            em_delimiter: '*',
            strike_delimiter: "~~".to_string(),
            underline_delimiters: ("<u>".to_string(), "</u>".to_string()),
            escape_text: false,
        }
    }
}

/// Options for Markdown → document parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Recognize pipe tables
    pub tables: bool,

    /// Recognize `~~strikethrough~~`
    pub strikethrough: bool,

    /// Recognize `- [ ]` / `- [x]` task list items
    pub task_lists: bool,

    /// Keep single newlines inside a paragraph as line breaks instead of
    /// folding them into spaces
    pub soft_breaks_as_hard: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            task_lists: true,
            soft_breaks_as_hard: true,
        }
    }
}

impl ParseOptions {
    pub(crate) fn to_cmark(self) -> pulldown_cmark::Options {
        let mut options = pulldown_cmark::Options::empty();
        if self.tables {
            options.insert(pulldown_cmark::Options::ENABLE_TABLES);
        }
        if self.strikethrough {
            options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            options.insert(pulldown_cmark::Options::ENABLE_TASKLISTS);
        }
        options
    }
}
