//! Tag tree to HTML.

use std::borrow::Cow;

use super::MAX_DEPTH;
use super::tag::TagKind;
use super::tree::{Nesting, NodeId, NodeKind, Tree};

enum Step {
    Enter(NodeId),
    Exit(NodeId),
}

/// Render a parsed tree.
///
/// Iterative so that deeply nested input cannot exhaust the stack.
pub(crate) fn render(tree: &Tree) -> String {
    let nesting = tree.nesting();
    let mut out = String::new();
    // Content of closed tags still being rendered, innermost last.
    let mut buffers: Vec<String> = Vec::new();
    let mut steps: Vec<Step> = enter_children(tree, Tree::ROOT).collect();

    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(id) => match &tree.node(id).kind {
                NodeKind::Root => {}
                NodeKind::Text(text) => current(&mut buffers, &mut out).push_str(text),
                NodeKind::Tag {
                    source,
                    closed: false,
                    ..
                } => {
                    current(&mut buffers, &mut out).push_str(source);
                    steps.extend(enter_children(tree, id));
                }
                NodeKind::Tag { closed: true, .. } => {
                    buffers.push(String::new());
                    steps.push(Step::Exit(id));
                    steps.extend(enter_children(tree, id));
                }
            },
            Step::Exit(id) => {
                let content = buffers.pop().unwrap_or_default();
                if let Some(kind) = tree.tag_kind(id) {
                    let html = wrap(nesting[id], kind, &content);
                    current(&mut buffers, &mut out).push_str(&html);
                }
            }
        }
    }

    out
}

/// Apply a closed tag to its rendered content.
fn wrap(nesting: Nesting, kind: TagKind, content: &str) -> Cow<'_, str> {
    if content.is_empty() {
        return Cow::Borrowed("");
    }

    if kind == TagKind::Code && non_blank_lines(content) > 1 {
        return Cow::Owned(format!("<pre>{content}</pre>"));
    }

    if kind.is_script() && nesting.inside_script {
        return Cow::Borrowed(content);
    }

    if nesting.depth() > MAX_DEPTH {
        return Cow::Borrowed(content);
    }

    let (open, close) = kind.wrapper();
    Cow::Owned(format!("{open}{content}{close}"))
}

fn non_blank_lines(content: &str) -> usize {
    content
        .split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .count()
}

/// Children of `id` as steps, reversed so they pop in document order.
fn enter_children(tree: &Tree, id: NodeId) -> impl Iterator<Item = Step> + '_ {
    tree.node(id).children.iter().rev().map(|&child| Step::Enter(child))
}

fn current<'a>(buffers: &'a mut Vec<String>, out: &'a mut String) -> &'a mut String {
    match buffers.last_mut() {
        Some(buffer) => buffer,
        None => out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank_lines() {
        assert_eq!(non_blank_lines("one"), 1);
        assert_eq!(non_blank_lines("one\n\n  \r\n"), 1);
        assert_eq!(non_blank_lines("one\r\ntwo"), 2);
        assert_eq!(non_blank_lines("a\rb\nc"), 3);
    }
}
