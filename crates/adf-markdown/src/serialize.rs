//! Document tree → Markdown serialization
//!
//! Blocks are rendered independently and joined with a blank line. Node kinds
//! without a rule of their own are rendered through their children, so content
//! nested in panels, expands or kinds added upstream is never dropped.

use serde_json::Value;

use adf_core::{
    collect_text, collect_text_from_value, AdfError, Document, Mark, MarkKind, Node, NodeKind,
    Result, MAX_DEPTH,
};

use crate::options::WriterOptions;

/// Serialize a document, falling back to its plain text if rendering fails
pub fn serialize(doc: &Document, options: &WriterOptions) -> String {
    render(doc, options).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "markdown rendering failed, falling back to plain text");
        collect_text(doc)
    })
}

/// Serialize raw JSON; anything that is not a document yields its plain text
pub fn serialize_value(value: &Value, options: &WriterOptions) -> String {
    match Document::from_value(value.clone()) {
        Ok(doc) => serialize(&doc, options),
        Err(err) => {
            tracing::debug!(error = %err, "not a document, extracting plain text");
            collect_text_from_value(value)
        }
    }
}

/// Serialize a document, reporting failures instead of recovering
pub fn render(doc: &Document, options: &WriterOptions) -> Result<String> {
    serialize_blocks(&doc.content, options, 0)
}

fn check_depth(depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        Err(AdfError::DepthExceeded { limit: MAX_DEPTH })
    } else {
        Ok(())
    }
}

fn is_inline(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Text
            | NodeKind::HardBreak
            | NodeKind::InlineCard
            | NodeKind::Mention
            | NodeKind::Emoji
            | NodeKind::Status
            | NodeKind::Date
    )
}

/// Rendered pieces of a block sequence, with runs of loose inline nodes
/// rendered together as one paragraph
fn block_pieces(nodes: &[Node], options: &WriterOptions, depth: usize) -> Result<Vec<String>> {
    let mut pieces = Vec::new();
    let mut i = 0;

    while i < nodes.len() {
        let piece = if is_inline(&nodes[i].kind) {
            let start = i;
            while i < nodes.len() && is_inline(&nodes[i].kind) {
                i += 1;
            }
            serialize_inlines(&nodes[start..i], options, depth)?
        } else {
            i += 1;
            serialize_block(&nodes[i - 1], options, depth)?
        };
        pieces.push(piece);
    }

    Ok(pieces)
}

fn serialize_blocks(nodes: &[Node], options: &WriterOptions, depth: usize) -> Result<String> {
    check_depth(depth)?;
    let blocks: Vec<String> = block_pieces(nodes, options, depth)?
        .into_iter()
        .map(|block| block.trim_end_matches('\n').to_string())
        .filter(|block| !block.trim().is_empty())
        .collect();
    Ok(blocks.join("\n\n"))
}

fn serialize_block(node: &Node, options: &WriterOptions, depth: usize) -> Result<String> {
    check_depth(depth)?;

    match &node.kind {
        NodeKind::Paragraph => serialize_inlines(node.children(), options, depth + 1),

        NodeKind::Heading => {
            let text = serialize_inlines(node.children(), options, depth + 1)?;
            let text = text.replace('\n', " ");
            let text = text.trim();
            if text.is_empty() {
                return Ok(String::new());
            }
            Ok(format!("{} {}", "#".repeat(node.level() as usize), text))
        }

        NodeKind::BulletList | NodeKind::OrderedList | NodeKind::TaskList => {
            serialize_list(node, options, depth, 0)
        }

        NodeKind::CodeBlock => Ok(serialize_code_block(node, options)),

        NodeKind::Blockquote => {
            let inner = serialize_blocks(node.children(), options, depth + 1)?;
            Ok(quote(&inner))
        }

        NodeKind::Rule => Ok(options.hr.clone()),

        NodeKind::Table => serialize_table(node, options, depth),

        NodeKind::BlockCard | NodeKind::EmbedCard => Ok(card_link(node).unwrap_or_default()),

        kind if is_inline(kind) => serialize_inlines(std::slice::from_ref(node), options, depth),

        // Everything else contributes whatever its children render to
        _ if node.children().iter().all(|child| renders_inline(child, depth + 1)) => {
            serialize_inlines(node.children(), options, depth + 1)
        }
        _ => serialize_blocks(node.children(), options, depth + 1),
    }
}

/// Inline kinds, and unknown kinds holding nothing but inline content
fn renders_inline(node: &Node, depth: usize) -> bool {
    is_inline(&node.kind)
        || (depth <= MAX_DEPTH
            && matches!(node.kind, NodeKind::Other(_))
            && node.children().iter().all(|child| renders_inline(child, depth + 1)))
}

fn quote(inner: &str) -> String {
    inner
        .lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn serialize_list(
    list: &Node,
    options: &WriterOptions,
    depth: usize,
    indent: usize,
) -> Result<String> {
    check_depth(depth)?;

    let prefix = " ".repeat(indent);
    let mut number = list.attr("order").and_then(Value::as_u64).unwrap_or(1);
    let mut out = String::new();

    for item in list.children() {
        if is_list(&item.kind) {
            // Task lists nest directly inside their parent list
            out.push_str(&serialize_list(item, options, depth + 1, indent + options.list_indent)?);
            out.push('\n');
            continue;
        }

        let bullet = format!("{} ", options.bullet_list_marker);
        let (marker, width) = if item.kind == NodeKind::TaskItem {
            let done = item.attr_str("state") == Some("DONE");
            let marker = format!("{bullet}[{}] ", if done { 'x' } else { ' ' });
            // The checkbox is part of the item text, not of its marker
            (marker, bullet.len())
        } else if list.kind == NodeKind::OrderedList {
            let marker = format!("{number}. ");
            number += 1;
            let width = marker.len();
            (marker, width)
        } else {
            let width = bullet.len();
            (bullet, width)
        };

        let content_indent = if options.indent_to_marker {
            indent + width
        } else {
            indent + options.list_indent
        };

        out.push_str(&prefix);
        out.push_str(&marker);
        serialize_list_item(item, options, depth + 1, content_indent, &mut out)?;
    }

    Ok(out.trim_end_matches('\n').to_string())
}

fn is_list(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::BulletList | NodeKind::OrderedList | NodeKind::TaskList
    )
}

enum ItemPiece {
    /// Lines of a block inside the item
    Text(String),
    /// A nested list, already indented
    Nested(String),
}

fn serialize_list_item(
    item: &Node,
    options: &WriterOptions,
    depth: usize,
    content_indent: usize,
    out: &mut String,
) -> Result<()> {
    check_depth(depth)?;

    let children = item.children();
    let mut pieces = Vec::new();
    let mut i = 0;

    while i < children.len() {
        let child = &children[i];
        if is_inline(&child.kind) {
            let start = i;
            while i < children.len() && is_inline(&children[i].kind) {
                i += 1;
            }
            pieces.push(ItemPiece::Text(serialize_inlines(
                &children[start..i],
                options,
                depth + 1,
            )?));
            continue;
        }

        i += 1;
        let piece = if is_list(&child.kind) {
            ItemPiece::Nested(serialize_list(child, options, depth + 1, content_indent)?)
        } else if child.kind == NodeKind::Paragraph {
            ItemPiece::Text(serialize_inlines(child.children(), options, depth + 1)?)
        } else {
            ItemPiece::Text(serialize_block(child, options, depth + 1)?)
        };
        pieces.push(piece);
    }

    let continuation = " ".repeat(content_indent);
    let mut on_marker_line = true;

    for piece in pieces {
        match piece {
            ItemPiece::Text(text) => {
                let text = text.trim_end_matches('\n');
                if text.trim().is_empty() {
                    continue;
                }
                // Blank line between blocks of one item
                if !on_marker_line {
                    out.push('\n');
                }
                for line in text.lines() {
                    if !on_marker_line && !line.is_empty() {
                        out.push_str(&continuation);
                    }
                    on_marker_line = false;
                    out.push_str(line);
                    out.push('\n');
                }
            }
            ItemPiece::Nested(list) => {
                if on_marker_line {
                    out.push('\n');
                    on_marker_line = false;
                }
                out.push_str(&list);
                out.push('\n');
            }
        }
    }

    if on_marker_line {
        out.push('\n');
    }

    Ok(())
}

fn serialize_code_block(node: &Node, options: &WriterOptions) -> String {
    let code = node.plain_text();
    let language = node.attr_str("language").unwrap_or("");

    // Lengthen the fence until the code cannot close it
    let mut fence = options.fence.clone();
    while fence.is_empty() || code.contains(fence.as_str()) {
        fence.push(fence.chars().last().unwrap_or('`'));
    }

    if code.is_empty() {
        format!("{fence}{language}\n{fence}")
    } else {
        format!("{fence}{language}\n{code}\n{fence}")
    }
}

fn serialize_table(table: &Node, options: &WriterOptions, depth: usize) -> Result<String> {
    let mut rows: Vec<Vec<String>> = Vec::new();

    for row in table.children() {
        if row.kind != NodeKind::TableRow {
            continue;
        }
        let cells = row
            .children()
            .iter()
            .map(|cell| serialize_cell(cell, options, depth + 2))
            .collect::<Result<Vec<_>>>()?;
        rows.push(cells);
    }

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return Ok(String::new());
    }

    let separator = vec!["---".to_string(); columns];
    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (i, row) in rows.iter().enumerate() {
        lines.push(table_row(row, columns));
        if i == 0 {
            lines.push(table_row(&separator, columns));
        }
    }

    Ok(lines.join("\n"))
}

fn serialize_cell(cell: &Node, options: &WriterOptions, depth: usize) -> Result<String> {
    let text = serialize_blocks(cell.children(), options, depth)?;
    let joined = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Ok(joined.replace('|', "\\|"))
}

fn table_row(cells: &[String], columns: usize) -> String {
    let mut line = String::from("|");
    for i in 0..columns {
        line.push(' ');
        line.push_str(cells.get(i).map(String::as_str).unwrap_or(""));
        line.push_str(" |");
    }
    line
}

/// A node with the marks still to be applied to it, innermost first
type Run<'a> = (&'a Node, &'a [&'a Mark]);

fn serialize_inlines(nodes: &[Node], options: &WriterOptions, depth: usize) -> Result<String> {
    check_depth(depth)?;
    let marks: Vec<Vec<&Mark>> = nodes.iter().map(ordered_marks).collect();
    let runs: Vec<Run<'_>> = nodes
        .iter()
        .zip(&marks)
        .map(|(node, marks)| (node, marks.as_slice()))
        .collect();

    let mut out = String::new();
    serialize_runs(&runs, options, depth, &mut out)?;
    Ok(out)
}

/// Marks of a text node, innermost first. Code spans cannot hold other
/// markup, so code always comes first.
fn ordered_marks(node: &Node) -> Vec<&Mark> {
    if !node.is_text() {
        return Vec::new();
    }
    let (mut marks, rest): (Vec<&Mark>, Vec<&Mark>) = node
        .marks()
        .iter()
        .partition(|mark| mark.kind == MarkKind::Code);
    marks.extend(rest);
    marks
}

/// Render inline nodes, wrapping adjacent siblings that share an outermost
/// mark in a single pair of delimiters
fn serialize_runs(runs: &[Run<'_>], options: &WriterOptions, depth: usize, out: &mut String) -> Result<()> {
    check_depth(depth)?;

    let mut i = 0;
    while i < runs.len() {
        let (node, marks) = runs[i];
        let Some(outer) = marks.last() else {
            serialize_inline(node, options, depth, out)?;
            i += 1;
            continue;
        };

        let start = i;
        while i < runs.len() && runs[i].1.last() == Some(outer) {
            i += 1;
        }
        let inner: Vec<Run<'_>> = runs[start..i]
            .iter()
            .map(|&(node, marks)| (node, &marks[..marks.len() - 1]))
            .collect();

        let mut text = String::new();
        serialize_runs(&inner, options, depth + 1, &mut text)?;
        out.push_str(&apply_mark(text, outer, options));
    }

    Ok(())
}

/// Render one inline node without its marks
fn serialize_inline(node: &Node, options: &WriterOptions, depth: usize, out: &mut String) -> Result<()> {
    check_depth(depth)?;

    match node.kind {
        NodeKind::Text => {
            let raw = node.text.as_deref().unwrap_or("");
            if options.escape_text && !node.has_mark(&MarkKind::Code) {
                out.push_str(&escape_markdown(raw));
            } else {
                out.push_str(raw);
            }
        }

        NodeKind::HardBreak => out.push('\n'),

        NodeKind::InlineCard | NodeKind::BlockCard | NodeKind::EmbedCard => {
            if let Some(link) = card_link(node) {
                out.push_str(&link);
            }
        }

        NodeKind::Mention => {
            if let Some(name) = mention_name(node) {
                out.push_str("@[");
                out.push_str(name);
                out.push(']');
            }
        }

        NodeKind::Emoji => {
            if let Some(short_name) = node.attr_str("shortName") {
                out.push(':');
                out.push_str(short_name.trim_matches(':'));
                out.push(':');
            } else if let Some(text) = node.attr_str("text") {
                out.push_str(text);
            }
        }

        _ => out.push_str(&serialize_inlines(node.children(), options, depth + 1)?),
    }

    Ok(())
}

fn apply_mark(text: String, mark: &Mark, options: &WriterOptions) -> String {
    match mark.kind {
        MarkKind::Strong => wrap_trimmed(&text, &options.strong_delimiter, &options.strong_delimiter),
        MarkKind::Em => {
            let delimiter = options.em_delimiter.to_string();
            wrap_trimmed(&text, &delimiter, &delimiter)
        }
        MarkKind::Strike => wrap_trimmed(&text, &options.strike_delimiter, &options.strike_delimiter),
        MarkKind::Underline => {
            let (open, close) = &options.underline_delimiters;
            wrap_trimmed(&text, open, close)
        }
        MarkKind::Code => code_span(&text),
        MarkKind::Link => match mark.attr_str("href") {
            Some(href) => format!("[{text}]({href})"),
            None => text,
        },
        _ => text,
    }
}

/// Wrap the non-blank core of `text`, keeping surrounding whitespace outside
/// the delimiters
fn wrap_trimmed(text: &str, open: &str, close: &str) -> String {
    let core = text.trim();
    if core.is_empty() {
        return text.to_string();
    }
    let start = text.len() - text.trim_start().len();
    let end = start + core.len();
    format!("{}{open}{core}{close}{}", &text[..start], &text[end..])
}

fn code_span(code: &str) -> String {
    if code.is_empty() {
        return String::new();
    }
    let backticks = if code.contains('`') { "``" } else { "`" };
    let space = if code.starts_with('`') || code.ends_with('`') {
        " "
    } else {
        ""
    };
    format!("{backticks}{space}{code}{space}{backticks}")
}

fn card_link(node: &Node) -> Option<String> {
    let data = node.attr("data");
    let url = node
        .attr_str("url")
        .or_else(|| data?.get("url")?.as_str())?;
    let title = node
        .attr_str("title")
        .or_else(|| data?.get("name")?.as_str())
        .unwrap_or(url);
    Some(format!("[{title}]({url})"))
}

fn mention_name(node: &Node) -> Option<&str> {
    node.attr_str("text")
        .map(|text| text.trim_start_matches('@'))
        .filter(|name| !name.is_empty())
        .or_else(|| node.attr_str("id"))
}

/// Escape Markdown punctuation in plain text
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn default_options() -> WriterOptions {
        WriterOptions::default()
    }

    fn md(content: Vec<Node>) -> String {
        serialize(&Document::new(content), &default_options())
    }

    fn md_json(value: Value) -> String {
        serialize_value(&value, &default_options())
    }

    fn marked(text: &str, kinds: &[MarkKind]) -> Node {
        kinds
            .iter()
            .fold(Node::text(text), |node, kind| node.with_mark(Mark::new(kind.clone())))
    }

    fn para(text: &str) -> Node {
        Node::paragraph(vec![Node::text(text)])
    }

    #[test]
    fn test_heading_then_paragraph() {
        let result = md(vec![Node::heading(1, "Title"), para("Hello world")]);
        assert_eq!(result, "# Title\n\nHello world");
    }

    #[test]
    fn test_heading_levels_and_blank_heading() {
        assert_eq!(md(vec![Node::heading(4, "Deep")]), "#### Deep");
        assert_eq!(md(vec![Node::heading(2, "  "), para("x")]), "x");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(md(Vec::new()), "");
        assert_eq!(md(vec![Node::paragraph(Vec::new())]), "");
    }

    #[test]
    fn test_marks() {
        let result = md(vec![Node::paragraph(vec![
            marked("bold", &[MarkKind::Strong]),
            Node::text(" "),
            marked("it", &[MarkKind::Em]),
            Node::text(" "),
            marked("x", &[MarkKind::Code]),
            Node::text(" "),
            marked("gone", &[MarkKind::Strike]),
            Node::text(" "),
            marked("under", &[MarkKind::Underline]),
        ])]);
        assert_eq!(result, "**bold** *it* `x` ~~gone~~ <u>under</u>");
    }

    #[test]
    fn test_marks_apply_in_listed_order() {
        let strong_then_link = Node::text("site")
            .with_mark(Mark::new(MarkKind::Strong))
            .with_mark(Mark::link("https://example.com"));
        let link_then_strong = Node::text("site")
            .with_mark(Mark::link("https://example.com"))
            .with_mark(Mark::new(MarkKind::Strong));

        assert_eq!(
            md(vec![Node::paragraph(vec![strong_then_link])]),
            "[**site**](https://example.com)"
        );
        assert_eq!(
            md(vec![Node::paragraph(vec![link_then_strong])]),
            "**[site](https://example.com)**"
        );
    }

    #[test]
    fn test_adjacent_runs_share_outer_marks() {
        let result = md(vec![Node::paragraph(vec![
            marked("Hello ", &[MarkKind::Strong]),
            marked("world", &[MarkKind::Em, MarkKind::Strong]),
        ])]);
        assert_eq!(result, "**Hello *world***");

        let link = Mark::link("https://example.com");
        let result = md(vec![Node::paragraph(vec![
            Node::text("see ").with_mark(link.clone()),
            marked("docs", &[MarkKind::Strong]).with_mark(link),
            Node::text(" now"),
        ])]);
        assert_eq!(result, "[see **docs**](https://example.com) now");
    }

    #[test]
    fn test_code_mark_stays_innermost() {
        let node = Node::text("cmd")
            .with_mark(Mark::new(MarkKind::Strong))
            .with_mark(Mark::new(MarkKind::Code));
        assert_eq!(md(vec![Node::paragraph(vec![node])]), "**`cmd`**");
    }

    #[test]
    fn test_strong_keeps_whitespace_outside() {
        let result = md(vec![Node::paragraph(vec![
            Node::text("a"),
            marked(" bold ", &[MarkKind::Strong]),
            Node::text("b"),
        ])]);
        assert_eq!(result, "a **bold** b");
    }

    #[test]
    fn test_unknown_mark_ignored() {
        let node = Node::text("red").with_mark(Mark::new(MarkKind::TextColor));
        assert_eq!(md(vec![Node::paragraph(vec![node])]), "red");
    }

    #[test]
    fn test_code_span_with_backticks() {
        assert_eq!(code_span("a`b"), "``a`b``");
        assert_eq!(code_span("`x"), "`` `x ``");
    }

    #[test]
    fn test_hard_break() {
        let result = md(vec![Node::paragraph(vec![
            Node::text("one"),
            Node::hard_break(),
            Node::text("two"),
        ])]);
        assert_eq!(result, "one\ntwo");
    }

    #[test]
    fn test_bullet_list_nested() {
        let list = Node::bullet_list(vec![
            Node::list_item(vec![
                para("one"),
                Node::bullet_list(vec![Node::list_item(vec![
                    para("nested"),
                    Node::bullet_list(vec![Node::list_item(vec![para("deeper")])]),
                ])]),
            ]),
            Node::list_item(vec![para("two")]),
        ]);
        assert_eq!(md(vec![list]), "- one\n  - nested\n    - deeper\n- two");
    }

    #[test]
    fn test_ordered_list_with_start() {
        let list = Node::ordered_list(
            3,
            vec![
                Node::list_item(vec![para("three")]),
                Node::list_item(vec![
                    para("four"),
                    Node::ordered_list(1, vec![Node::list_item(vec![para("sub")])]),
                ]),
            ],
        );
        assert_eq!(md(vec![list]), "3. three\n4. four\n  1. sub");
    }

    #[test]
    fn test_list_item_continuation_lines() {
        let list = Node::bullet_list(vec![Node::list_item(vec![
            Node::paragraph(vec![Node::text("first"), Node::hard_break(), Node::text("second")]),
            para("next paragraph"),
        ])]);
        assert_eq!(md(vec![list]), "- first\n  second\n\n  next paragraph");
    }

    #[test]
    fn test_list_item_with_code_block() {
        let list = Node::bullet_list(vec![Node::list_item(vec![
            para("run"),
            Node::code_block(Some("sh"), "make"),
        ])]);
        assert_eq!(md(vec![list]), "- run\n\n  ```sh\n  make\n  ```");
    }

    #[test]
    fn test_list_item_nested_list_then_paragraph() {
        let list = Node::bullet_list(vec![Node::list_item(vec![
            para("intro"),
            Node::bullet_list(vec![Node::list_item(vec![para("child")])]),
            para("outro"),
        ])]);
        assert_eq!(md(vec![list]), "- intro\n  - child\n\n  outro");
    }

    #[test]
    fn test_indent_to_marker() {
        let options = WriterOptions {
            indent_to_marker: true,
            ..WriterOptions::default()
        };
        let doc = Document::new(vec![Node::ordered_list(
            9,
            vec![
                Node::list_item(vec![
                    para("nine"),
                    Node::ordered_list(1, vec![Node::list_item(vec![para("sub")])]),
                ]),
                Node::list_item(vec![para("ten"), para("more")]),
            ],
        )]);
        assert_eq!(
            serialize(&doc, &options),
            "9. nine\n   1. sub\n10. ten\n\n    more"
        );
    }

    #[test]
    fn test_task_list() {
        let value = json!({
            "version": 1,
            "type": "doc",
            "content": [{
                "type": "taskList",
                "attrs": {"localId": "l"},
                "content": [
                    {"type": "taskItem", "attrs": {"localId": "a", "state": "TODO"},
                     "content": [{"type": "text", "text": "write"}]},
                    {"type": "taskItem", "attrs": {"localId": "b", "state": "DONE"},
                     "content": [{"type": "text", "text": "ship"}]}
                ]
            }]
        });
        assert_eq!(md_json(value), "- [ ] write\n- [x] ship");
    }

    #[test]
    fn test_code_block() {
        let result = md(vec![Node::code_block(Some("rust"), "fn main() {}\n\nlet x = 1;")]);
        assert_eq!(result, "```rust\nfn main() {}\n\nlet x = 1;\n```");
        assert_eq!(md(vec![Node::code_block(None, "")]), "```\n```");
    }

    #[test]
    fn test_code_block_containing_fence() {
        let result = md(vec![Node::code_block(None, "```\ninner\n```")]);
        assert_eq!(result, "````\n```\ninner\n```\n````");
    }

    #[test]
    fn test_blockquote() {
        let result = md(vec![Node::blockquote(vec![para("first"), para("second")])]);
        assert_eq!(result, "> first\n>\n> second");
    }

    #[test]
    fn test_rule() {
        assert_eq!(md(vec![para("a"), Node::rule(), para("b")]), "a\n\n---\n\nb");
    }

    #[test]
    fn test_table() {
        let cell = |kind: NodeKind, text: &str| Node::new(kind).with_content(vec![para(text)]);
        let row = |cells: Vec<Node>| Node::new(NodeKind::TableRow).with_content(cells);
        let table = Node::new(NodeKind::Table).with_content(vec![
            row(vec![
                cell(NodeKind::TableHeader, "Name"),
                cell(NodeKind::TableHeader, "Value"),
            ]),
            row(vec![
                cell(NodeKind::TableCell, "a|b"),
                cell(NodeKind::TableCell, "1"),
            ]),
            row(vec![cell(NodeKind::TableCell, "short")]),
        ]);
        assert_eq!(
            md(vec![table]),
            "| Name | Value |\n| --- | --- |\n| a\\|b | 1 |\n| short |  |"
        );
    }

    #[test]
    fn test_cards_mentions_emoji() {
        let value = json!({
            "version": 1,
            "type": "doc",
            "content": [
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "ping "},
                    {"type": "mention", "attrs": {"id": "u1", "text": "@Ada Lovelace"}},
                    {"type": "text", "text": " "},
                    {"type": "emoji", "attrs": {"shortName": ":tada:", "text": "🎉"}},
                    {"type": "text", "text": " see "},
                    {"type": "inlineCard", "attrs": {"url": "https://example.com/x"}}
                ]},
                {"type": "blockCard", "attrs": {"data": {"name": "Runbook", "url": "https://example.com/runbook"}}}
            ]
        });
        assert_eq!(
            md_json(value),
            "ping @[Ada Lovelace] :tada: see [https://example.com/x](https://example.com/x)\n\n[Runbook](https://example.com/runbook)"
        );
    }

    #[test]
    fn test_unknown_nodes_recurse() {
        let value = json!({
            "version": 1,
            "type": "doc",
            "content": [
                {"type": "panel", "attrs": {"panelType": "info"}, "content": [
                    {"type": "paragraph", "content": [{"type": "text", "text": "inside panel"}]}
                ]},
                {"type": "futureBlock", "content": [
                    {"type": "text", "text": "loose "},
                    {"type": "futureInline", "content": [{"type": "text", "text": "inline"}]}
                ]},
                {"type": "futureLeaf", "attrs": {"x": 1}},
                {"type": "paragraph", "content": [{"type": "text", "text": "after"}]}
            ]
        });
        assert_eq!(md_json(value), "inside panel\n\nloose inline\n\nafter");
    }

    #[test]
    fn test_depth_limit_falls_back_to_text() {
        let mut node = Node::paragraph(vec![Node::text("buried")]);
        for _ in 0..(MAX_DEPTH + 5) {
            node = Node::blockquote(vec![node]);
        }
        let doc = Document::new(vec![node]);

        assert!(matches!(
            render(&doc, &default_options()),
            Err(AdfError::DepthExceeded { .. })
        ));
        assert_eq!(serialize(&doc, &default_options()), "buried");
    }

    #[test]
    fn test_serialize_value_not_a_document() {
        let value = json!({"content": [{"type": "text", "text": "salvaged"}]});
        assert_eq!(md_json(value), "salvaged");
    }

    #[test]
    fn test_escape_text_option() {
        let options = WriterOptions {
            escape_text: true,
            ..WriterOptions::default()
        };
        let doc = Document::new(vec![Node::paragraph(vec![
            Node::text("2*3 [x]"),
            marked("a*b", &[MarkKind::Code]),
        ])]);
        assert_eq!(serialize(&doc, &options), "2\\*3 \\[x\\]`a*b`");
    }

    #[test]
    fn test_custom_options() {
        let options = WriterOptions {
            bullet_list_marker: '*',
            list_indent: 4,
            hr: "***".to_string(),
            ..WriterOptions::default()
        };
        let doc = Document::new(vec![
            Node::bullet_list(vec![Node::list_item(vec![
                para("a"),
                Node::bullet_list(vec![Node::list_item(vec![para("b")])]),
            ])]),
            Node::rule(),
        ]);
        assert_eq!(serialize(&doc, &options), "* a\n    * b\n\n***");
    }
}
