//! Markdown → document tree conversion
//!
//! The conversion walks the `pulldown-cmark` event stream and keeps a stack of
//! open block nodes. Inline formatting is tracked as a stack of marks that is
//! copied onto every text node emitted while it is active, innermost mark
//! first.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use serde_json::Value;

use adf_core::{AdfError, Document, Mark, MarkKind, Node, NodeKind, Result};

use crate::options::ParseOptions;

/// A routine that turns Markdown into a document tree.
///
/// Implementations may fail; callers going through
/// [`markdown_to_doc_with`](crate::markdown_to_doc_with) get the paragraph
/// fallback instead of the error.
pub trait MarkdownConverter: Send + Sync {
    fn convert(&self, markdown: &str) -> Result<Document>;
}

/// CommonMark converter backed by `pulldown-cmark`
#[derive(Debug, Clone, Default)]
pub struct CmarkConverter {
    options: ParseOptions,
}

impl CmarkConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }
}

impl MarkdownConverter for CmarkConverter {
    fn convert(&self, markdown: &str) -> Result<Document> {
        let mut builder = Builder::new(self.options);
        for event in Parser::new_ext(markdown, self.options.to_cmark()) {
            builder.event(event)?;
        }
        builder.finish()
    }
}

/// An open block node
struct Frame {
    node: Node,
    /// Paragraph opened on our own to hold loose inline content
    implicit: bool,
    /// Children are spliced into the parent on close
    transparent: bool,
    /// Text is collected verbatim into `buffer` (code and HTML blocks)
    raw: bool,
    buffer: String,
}

impl Frame {
    fn new(node: Node) -> Self {
        Self {
            node,
            implicit: false,
            transparent: false,
            raw: false,
            buffer: String::new(),
        }
    }

    fn raw(node: Node) -> Self {
        Self {
            raw: true,
            ..Self::new(node)
        }
    }

    fn accepts_inline(&self) -> bool {
        self.transparent
            || matches!(
                self.node.kind,
                NodeKind::Paragraph | NodeKind::Heading | NodeKind::TaskItem
            )
    }

    /// Turn the frame into its finished node
    fn finish(self) -> Node {
        let Frame {
            mut node,
            raw,
            buffer,
            ..
        } = self;

        if raw {
            let text = match node.kind {
                NodeKind::CodeBlock => buffer.strip_suffix('\n').unwrap_or(&buffer),
                _ => buffer.trim_end(),
            };
            node.content = Some(if text.is_empty() {
                Vec::new()
            } else {
                vec![Node::text(text)]
            });
        }

        // Containers that must hold a block even when empty
        if matches!(
            node.kind,
            NodeKind::ListItem | NodeKind::TableCell | NodeKind::TableHeader
        ) && node.children().is_empty()
        {
            node.content = Some(vec![Node::paragraph(Vec::new())]);
        }

        node
    }
}

struct Builder {
    options: ParseOptions,
    stack: Vec<Frame>,
    root: Vec<Node>,
    marks: Vec<Mark>,
    in_table_head: bool,
    next_local_id: usize,
}

impl Builder {
    fn new(options: ParseOptions) -> Self {
        Self {
            options,
            stack: Vec::new(),
            root: Vec::new(),
            marks: Vec::new(),
            in_table_head: false,
            next_local_id: 0,
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag)?,
            Event::Text(text) | Event::Html(text) => self.text(&text),
            Event::InlineHtml(html) => self.push_text(&html),
            Event::Code(code) => {
                let mut marks = vec![Mark::new(MarkKind::Code)];
                marks.extend(self.active_marks());
                self.push_marked_text(&code, marks);
            }
            Event::SoftBreak => {
                if self.options.soft_breaks_as_hard {
                    self.push_inline(Node::hard_break());
                } else {
                    self.push_text(" ");
                }
            }
            Event::HardBreak => self.push_inline(Node::hard_break()),
            Event::Rule => {
                self.close_implicit();
                self.attach(Node::rule());
            }
            Event::TaskListMarker(checked) => self.task_marker(checked),
            Event::FootnoteReference(label) => self.push_text(&format!("[^{label}]")),
            _ => {}
        }
        Ok(())
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open(Frame::new(Node::paragraph(Vec::new()))),
            Tag::Heading { level, .. } => self.open(Frame::new(
                Node::new(NodeKind::Heading)
                    .with_attr("level", Value::from(level as u8))
                    .with_content(Vec::new()),
            )),
            Tag::BlockQuote(_) => self.open(Frame::new(Node::blockquote(Vec::new()))),
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(str::to_string)
                    }
                    CodeBlockKind::Indented => None,
                };
                self.open(Frame::raw(Node::code_block(language.as_deref(), "")));
            }
            Tag::HtmlBlock => self.open(Frame::raw(Node::paragraph(Vec::new()))),
            Tag::List(Some(start)) => self.open(Frame::new(Node::ordered_list(start, Vec::new()))),
            Tag::List(None) => self.open(Frame::new(Node::bullet_list(Vec::new()))),
            Tag::Item => self.open(Frame::new(Node::list_item(Vec::new()))),
            Tag::Table(_) => self.open(Frame::new(
                Node::new(NodeKind::Table).with_content(Vec::new()),
            )),
            Tag::TableHead => {
                self.in_table_head = true;
                self.open(Frame::new(
                    Node::new(NodeKind::TableRow).with_content(Vec::new()),
                ));
            }
            Tag::TableRow => self.open(Frame::new(
                Node::new(NodeKind::TableRow).with_content(Vec::new()),
            )),
            Tag::TableCell => {
                let kind = if self.in_table_head {
                    NodeKind::TableHeader
                } else {
                    NodeKind::TableCell
                };
                self.open(Frame::new(Node::new(kind).with_content(Vec::new())));
            }
            Tag::Emphasis => self.marks.push(Mark::new(MarkKind::Em)),
            Tag::Strong => self.marks.push(Mark::new(MarkKind::Strong)),
            Tag::Strikethrough => self.marks.push(Mark::new(MarkKind::Strike)),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut mark = Mark::link(&dest_url);
                if !title.is_empty() {
                    mark.attrs
                        .get_or_insert_with(Default::default)
                        .insert("title".to_string(), Value::String(title.to_string()));
                }
                self.marks.push(mark);
            }
            // Alt text becomes link text pointing at the image
            Tag::Image { dest_url, .. } => self.marks.push(Mark::link(&dest_url)),
            _ => {
                let mut frame = Frame::new(Node::new(NodeKind::Other("fragment".to_string())));
                frame.transparent = true;
                self.stack.push(frame);
            }
        }
    }

    fn end(&mut self, tag: TagEnd) -> Result<()> {
        match tag {
            TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Link
            | TagEnd::Image => {
                self.marks.pop();
                Ok(())
            }
            TagEnd::TableHead => {
                self.in_table_head = false;
                self.close()
            }
            _ => self.close(),
        }
    }

    fn open(&mut self, frame: Frame) {
        self.close_implicit();
        self.stack.push(frame);
    }

    fn close(&mut self) -> Result<()> {
        self.close_implicit();
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| AdfError::Conversion("end tag without an open block".to_string()))?;
        self.close_frame(frame);
        Ok(())
    }

    fn close_implicit(&mut self) {
        if self.stack.last().is_some_and(|f| f.implicit) {
            if let Some(frame) = self.stack.pop() {
                self.close_frame(frame);
            }
        }
    }

    fn close_frame(&mut self, frame: Frame) {
        let transparent = frame.transparent;
        let node = frame.finish();

        let parent_is_task = self
            .stack
            .last()
            .is_some_and(|f| f.node.kind == NodeKind::TaskItem);

        if transparent || (node.kind == NodeKind::Paragraph && parent_is_task) {
            for child in node.content.unwrap_or_default() {
                self.attach(child);
            }
        } else if matches!(node.kind, NodeKind::BulletList | NodeKind::OrderedList) {
            let list = self.finish_list(node);
            self.attach(list);
        } else {
            self.attach(node);
        }
    }

    /// A list holding any task item becomes a task list throughout
    fn finish_list(&mut self, mut list: Node) -> Node {
        let has_tasks = list
            .children()
            .iter()
            .any(|item| item.kind == NodeKind::TaskItem);
        if !has_tasks {
            return list;
        }

        let items = list.content.take().unwrap_or_default();
        let items = items
            .into_iter()
            .map(|item| match item.kind {
                NodeKind::ListItem => {
                    let mut task = self.task_item(false);
                    task.content = Some(unwrap_paragraphs(item.content.unwrap_or_default()));
                    task
                }
                _ => item,
            })
            .collect();

        Node::new(NodeKind::TaskList)
            .with_attr("localId", Value::String(self.local_id()))
            .with_content(items)
    }

    fn task_marker(&mut self, checked: bool) {
        let Some(index) = self
            .stack
            .iter()
            .rposition(|f| f.node.kind == NodeKind::ListItem)
        else {
            return;
        };
        let task = self.task_item(checked);
        let frame = &mut self.stack[index];
        frame.node.kind = task.kind;
        frame.node.attrs = task.attrs;
    }

    fn task_item(&mut self, checked: bool) -> Node {
        let state = if checked { "DONE" } else { "TODO" };
        Node::new(NodeKind::TaskItem)
            .with_attr("localId", Value::String(self.local_id()))
            .with_attr("state", Value::String(state.to_string()))
    }

    fn local_id(&mut self) -> String {
        self.next_local_id += 1;
        format!("task-{}", self.next_local_id)
    }

    fn attach(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(frame) => frame.node.content.get_or_insert_with(Vec::new).push(node),
            None => self.root.push(node),
        }
    }

    /// Content vector of the innermost block that can hold inline nodes,
    /// opening an implicit paragraph when needed
    fn inline_container(&mut self) -> &mut Vec<Node> {
        if !self.stack.last().is_some_and(Frame::accepts_inline) {
            let mut frame = Frame::new(Node::paragraph(Vec::new()));
            frame.implicit = true;
            self.stack.push(frame);
        }
        match self.stack.last_mut() {
            Some(frame) => frame.node.content.get_or_insert_with(Vec::new),
            None => &mut self.root,
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(frame) = self.stack.last_mut().filter(|f| f.raw) {
            frame.buffer.push_str(text);
            return;
        }
        self.push_text(text);
    }

    fn push_text(&mut self, text: &str) {
        let marks = self.active_marks();
        self.push_marked_text(text, marks);
    }

    /// Open marks, innermost first
    fn active_marks(&self) -> Vec<Mark> {
        self.marks.iter().rev().cloned().collect()
    }

    fn push_marked_text(&mut self, text: &str, marks: Vec<Mark>) {
        if text.is_empty() {
            return;
        }
        let marks = if marks.is_empty() { None } else { Some(marks) };
        let container = self.inline_container();

        if let Some(last) = container.last_mut() {
            if last.is_text() && last.marks == marks {
                last.text.get_or_insert_with(String::new).push_str(text);
                return;
            }
        }

        let mut node = Node::text(text);
        node.marks = marks;
        container.push(node);
    }

    fn push_inline(&mut self, node: Node) {
        self.inline_container().push(node);
    }

    fn finish(mut self) -> Result<Document> {
        self.close_implicit();
        if !self.stack.is_empty() {
            return Err(AdfError::Conversion(format!(
                "{} block(s) left open at end of input",
                self.stack.len()
            )));
        }
        Ok(Document::new(self.root))
    }
}

/// Paragraph children lifted into their parent, other blocks kept as-is
fn unwrap_paragraphs(nodes: Vec<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .flat_map(|node| match node.kind {
            NodeKind::Paragraph => node.content.unwrap_or_default(),
            _ => vec![node],
        })
        .collect()
}
