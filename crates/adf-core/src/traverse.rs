//! Depth-first traversal and rewriting of document trees
//!
//! Neither operation mutates its input. `transform` builds a new tree and may
//! share nothing with the original; subtrees the callback leaves alone are
//! cloned, never modified in place.

use crate::ast::Node;

/// Deepest nesting level either walker will enter.
///
/// Trees deserialized from JSON are already bounded well below this by the
/// parser's own recursion limit, so only programmatically built trees hit it.
pub const MAX_DEPTH: usize = 256;

/// What `traverse` should do after visiting a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Descend into the node's children, then continue with its siblings
    Continue,
    /// Skip the node's children but continue with its siblings
    SkipChildren,
    /// End the whole walk
    Stop,
}

/// What `transform` should put in place of a node
#[derive(Debug, Clone, PartialEq)]
pub enum Rewrite {
    /// Replace the node with exactly one node
    Replace(Node),
    /// Splice zero or more nodes in at the node's position
    Splice(Vec<Node>),
    /// Delete the node
    Remove,
}

impl From<Node> for Rewrite {
    fn from(node: Node) -> Self {
        Rewrite::Replace(node)
    }
}

impl From<Vec<Node>> for Rewrite {
    fn from(nodes: Vec<Node>) -> Self {
        Rewrite::Splice(nodes)
    }
}

impl From<Option<Node>> for Rewrite {
    fn from(node: Option<Node>) -> Self {
        node.map_or(Rewrite::Remove, Rewrite::Replace)
    }
}

/// Walk `nodes` depth-first, visiting each parent before its children.
///
/// `visit` receives the node, its parent (`None` for the top-level nodes) and
/// its depth (0 for the top-level nodes).
pub fn traverse<'a, F>(nodes: &'a [Node], mut visit: F)
where
    F: FnMut(&'a Node, Option<&'a Node>, usize) -> Visit,
{
    walk(nodes, None, 0, &mut visit);
}

/// Returns false once the walk has been stopped
fn walk<'a, F>(nodes: &'a [Node], parent: Option<&'a Node>, depth: usize, visit: &mut F) -> bool
where
    F: FnMut(&'a Node, Option<&'a Node>, usize) -> Visit,
{
    if depth > MAX_DEPTH {
        tracing::warn!(limit = MAX_DEPTH, "traversal depth limit reached, skipping subtree");
        return true;
    }

    for node in nodes {
        match visit(node, parent, depth) {
            Visit::Stop => return false,
            Visit::SkipChildren => {}
            Visit::Continue => {
                if let Some(children) = node.content.as_deref() {
                    if !walk(children, Some(node), depth + 1, visit) {
                        return false;
                    }
                }
            }
        }
    }

    true
}

/// Find the first node, in document order, matching `predicate`
pub fn find<'a, P>(nodes: &'a [Node], mut predicate: P) -> Option<&'a Node>
where
    P: FnMut(&Node) -> bool,
{
    let mut found = None;
    traverse(nodes, |node, _, _| {
        if predicate(node) {
            found = Some(node);
            Visit::Stop
        } else {
            Visit::Continue
        }
    });
    found
}

/// Count the nodes matching `predicate` anywhere in the tree
pub fn count<P>(nodes: &[Node], mut predicate: P) -> usize
where
    P: FnMut(&Node) -> bool,
{
    let mut total = 0;
    traverse(nodes, |node, _, _| {
        if predicate(node) {
            total += 1;
        }
        Visit::Continue
    });
    total
}

/// Rewrite a tree bottom-up.
///
/// Each node's children are transformed first; `f` then receives the node with
/// its new children and decides what replaces it. Returns the new top-level
/// sequence.
pub fn transform<F>(nodes: &[Node], mut f: F) -> Vec<Node>
where
    F: FnMut(Node) -> Rewrite,
{
    rewrite(nodes, 0, &mut f)
}

fn rewrite<F>(nodes: &[Node], depth: usize, f: &mut F) -> Vec<Node>
where
    F: FnMut(Node) -> Rewrite,
{
    if depth > MAX_DEPTH {
        tracing::warn!(limit = MAX_DEPTH, "transform depth limit reached, keeping subtree as-is");
        return nodes.to_vec();
    }

    let mut out = Vec::with_capacity(nodes.len());

    for node in nodes {
        let mut copy = node.shallow_clone();
        if let Some(children) = node.content.as_deref() {
            copy.content = Some(rewrite(children, depth + 1, f));
        }

        match f(copy) {
            Rewrite::Replace(replacement) => out.push(replacement),
            Rewrite::Splice(replacements) => out.extend(replacements),
            Rewrite::Remove => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Document, Mark, MarkKind, NodeKind};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Vec<Node> {
        vec![
            Node::heading(1, "Title"),
            Node::paragraph(vec![
                Node::text("Hello "),
                Node::text("world").with_mark(Mark::new(MarkKind::Strong)),
            ]),
            Node::bullet_list(vec![Node::list_item(vec![Node::paragraph(vec![
                Node::text("item"),
            ])])]),
        ]
    }

    #[test]
    fn test_traverse_parent_before_children() {
        let nodes = sample();
        let mut seen = Vec::new();
        traverse(&nodes, |node, parent, depth| {
            seen.push((
                node.kind.to_string(),
                parent.map(|p| p.kind.to_string()),
                depth,
            ));
            Visit::Continue
        });

        assert_eq!(seen[0], ("heading".to_string(), None, 0));
        assert_eq!(seen[1], ("text".to_string(), Some("heading".to_string()), 1));
        assert_eq!(seen[2], ("paragraph".to_string(), None, 0));
        assert_eq!(seen.last().unwrap(), &("text".to_string(), Some("paragraph".to_string()), 3));
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn test_traverse_skip_children() {
        let nodes = sample();
        let mut kinds = Vec::new();
        traverse(&nodes, |node, _, _| {
            kinds.push(node.kind.clone());
            if node.kind == NodeKind::Paragraph {
                Visit::SkipChildren
            } else {
                Visit::Continue
            }
        });

        // Every paragraph's text is skipped, siblings still visited
        assert_eq!(
            kinds,
            vec![
                NodeKind::Heading,
                NodeKind::Text,
                NodeKind::Paragraph,
                NodeKind::BulletList,
                NodeKind::ListItem,
                NodeKind::Paragraph,
            ]
        );
    }

    #[test]
    fn test_traverse_stop() {
        let nodes = sample();
        let mut visited = 0;
        traverse(&nodes, |node, _, _| {
            visited += 1;
            if node.kind == NodeKind::Paragraph {
                Visit::Stop
            } else {
                Visit::Continue
            }
        });
        assert_eq!(visited, 3);
    }

    #[test]
    fn test_find_and_count() {
        let nodes = sample();
        let strong = find(&nodes, |n| n.has_mark(&MarkKind::Strong)).unwrap();
        assert_eq!(strong.text.as_deref(), Some("world"));
        assert_eq!(count(&nodes, Node::is_text), 4);
        assert!(find(&nodes, |n| n.kind == NodeKind::Table).is_none());
    }

    #[test]
    fn test_transform_children_before_parent() {
        let nodes = sample();
        let mut order = Vec::new();
        transform(&nodes, |node| {
            order.push(node.kind.clone());
            Rewrite::Replace(node)
        });
        assert_eq!(order[0], NodeKind::Text);
        assert_eq!(order[1], NodeKind::Heading);
        assert_eq!(order.last(), Some(&NodeKind::BulletList));
    }

    #[test]
    fn test_transform_parent_sees_rewritten_children() {
        let nodes = vec![Node::paragraph(vec![Node::text("a"), Node::text("b")])];
        let out = transform(&nodes, |mut node| {
            if node.is_text() {
                node.text = node.text.map(|t| t.to_uppercase());
            } else if node.kind == NodeKind::Paragraph {
                assert_eq!(node.plain_text(), "AB");
            }
            node.into()
        });
        assert_eq!(out[0].plain_text(), "AB");
        assert_eq!(nodes[0].plain_text(), "ab");
    }

    #[test]
    fn test_transform_splice_and_remove() {
        let nodes = sample();
        let out = transform(&nodes, |node| match node.kind {
            NodeKind::Heading => Rewrite::Remove,
            NodeKind::BulletList => Rewrite::Splice(vec![Node::rule(), Node::rule()]),
            _ => Rewrite::Replace(node),
        });

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].kind, NodeKind::Paragraph);
        assert_eq!(out[1].kind, NodeKind::Rule);
        assert_eq!(out[2].kind, NodeKind::Rule);
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn test_transform_identity_preserves_unknown_nodes() {
        let doc = Document::from_value(json!({
            "version": 1,
            "type": "doc",
            "content": [{
                "type": "layoutSection",
                "attrs": {"width": 50},
                "marks": [{"type": "breakout", "attrs": {"mode": "wide"}}],
                "content": [
                    {"type": "layoutColumn", "content": [{"type": "text", "text": "x"}]}
                ]
            }]
        }))
        .unwrap();

        let out = transform(&doc.content, Rewrite::Replace);
        assert_eq!(out, doc.content);
    }

    #[test]
    fn test_transform_depth_limit_keeps_deep_subtree() {
        let mut node = Node::text("leaf");
        for _ in 0..(MAX_DEPTH + 10) {
            node = Node::new(NodeKind::Other("wrap".to_string())).with_content(vec![node]);
        }
        let nodes = vec![node];

        let mut calls = 0;
        let out = transform(&nodes, |n| {
            calls += 1;
            Rewrite::Replace(n)
        });
        assert_eq!(out, nodes);
        assert_eq!(calls, MAX_DEPTH + 1);

        let mut visits = 0;
        traverse(&nodes, |_, _, _| {
            visits += 1;
            Visit::Continue
        });
        assert_eq!(visits, MAX_DEPTH + 1);
    }
}
