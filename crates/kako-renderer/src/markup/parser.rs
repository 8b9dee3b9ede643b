//! Tag tokenizer and tree builder.

use std::collections::HashMap;

use super::tag::TagKind;
use super::tree::{NodeId, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Open { kind: TagKind, source: &'a str },
    Close { kind: TagKind, source: &'a str },
}

/// Parse escaped text into a tag tree.
///
/// Never fails: anything that is not a well-placed, known tag ends up as
/// text.
pub(crate) fn parse(input: &str, special: bool) -> Tree {
    let mut tree = Tree::new();
    let mut open = OpenTags::default();

    for token in tokenize(input, special) {
        let top = open.top();

        match token {
            Token::Text(text) => tree.push_text(top, text),
            Token::Open { kind, source } => {
                if tree.accepts(top, kind) {
                    let id = tree.push_tag(top, kind, source);
                    open.push(id, kind);
                } else {
                    tree.push_text(top, source);
                }
            }
            Token::Close { kind, source } => match open.matching(kind) {
                Some(pos) => tree.close(open.close_at(pos)),
                None => tree.push_text(top, source),
            },
        }
    }

    tree
}

/// Unclosed tags, innermost last, with a count per kind so a closer
/// without an opener is rejected without walking the stack.
#[derive(Debug, Default)]
struct OpenTags {
    stack: Vec<(NodeId, TagKind)>,
    counts: HashMap<TagKind, usize>,
}

impl OpenTags {
    fn top(&self) -> NodeId {
        self.stack.last().map_or(Tree::ROOT, |&(id, _)| id)
    }

    fn push(&mut self, id: NodeId, kind: TagKind) {
        self.stack.push((id, kind));
        *self.counts.entry(kind).or_default() += 1;
    }

    /// Position of the tag a closer of `kind` ends.
    ///
    /// Inside a literal tag only its own closer counts.
    fn matching(&self, kind: TagKind) -> Option<usize> {
        let &(_, top_kind) = self.stack.last()?;
        if top_kind.is_literal() {
            return (top_kind == kind).then_some(self.stack.len() - 1);
        }
        if self.counts.get(&kind).copied().unwrap_or_default() == 0 {
            return None;
        }
        self.stack.iter().rposition(|&(_, open)| open == kind)
    }

    /// Pop the tag at `pos` and everything opened after it. Only the tag at
    /// `pos` counts as closed.
    fn close_at(&mut self, pos: usize) -> NodeId {
        let id = self.stack[pos].0;
        for (_, kind) in self.stack.drain(pos..) {
            if let Some(count) = self.counts.get_mut(&kind) {
                *count -= 1;
            }
        }
        id
    }
}

fn tokenize(input: &str, special: bool) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(offset) = input[pos..].find('[') {
        let at = pos + offset;
        match parse_tag(&input[at..], special) {
            Some((token, len)) => {
                if text_start < at {
                    tokens.push(Token::Text(&input[text_start..at]));
                }
                tokens.push(token);
                pos = at + len;
                text_start = pos;
            }
            None => pos = at + 1,
        }
    }

    if text_start < input.len() {
        tokens.push(Token::Text(&input[text_start..]));
    }
    tokens
}

/// Parse `[name]`, `[name=value]` or `[/name]` at the start of `s`.
fn parse_tag(s: &str, special: bool) -> Option<(Token<'_>, usize)> {
    // Stop at the next bracket of either kind, so no text is scanned twice.
    let end = s[1..].find(['[', ']'])? + 1;
    if s.as_bytes()[end] != b']' {
        return None;
    }
    let source = &s[..=end];
    let inner = &s[1..end];

    let token = if let Some(name) = inner.strip_prefix('/') {
        Token::Close {
            kind: tag_named(name, special)?,
            source,
        }
    } else {
        let name = inner.split_once('=').map_or(inner, |(name, _)| name);
        Token::Open {
            kind: tag_named(name, special)?,
            source,
        }
    };

    Some((token, source.len()))
}

fn tag_named(name: &str, special: bool) -> Option<TagKind> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    TagKind::from_name(name, special)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::tree::NodeKind;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("a[b]c[/B]d", false),
            [
                Token::Text("a"),
                Token::Open {
                    kind: TagKind::Bold,
                    source: "[b]"
                },
                Token::Text("c"),
                Token::Close {
                    kind: TagKind::Bold,
                    source: "[/B]"
                },
                Token::Text("d"),
            ]
        );
    }

    #[test]
    fn test_tokenize_value_ignored() {
        assert_eq!(
            tokenize("[spoiler=x]", false),
            [Token::Open {
                kind: TagKind::Spoiler,
                source: "[spoiler=x]"
            }]
        );
    }

    #[test]
    fn test_tokenize_unknown_is_text() {
        assert_eq!(
            tokenize("[x][code:lit][/ b][", false),
            [Token::Text("[x][code:lit][/ b][")]
        );
    }

    #[test]
    fn test_tokenize_bracket_before_tag() {
        assert_eq!(
            tokenize("[[b]", false),
            [
                Token::Text("["),
                Token::Open {
                    kind: TagKind::Bold,
                    source: "[b]"
                }
            ]
        );
    }

    #[test]
    fn test_parse_closes_outer_leaves_inner_open() {
        let tree = parse("[b][i]x[/b]", false);
        let bold = tree.node(Tree::ROOT).children[0];
        assert!(matches!(
            tree.node(bold).kind,
            NodeKind::Tag {
                kind: TagKind::Bold,
                closed: true,
                ..
            }
        ));
        let italic = tree.node(bold).children[0];
        assert!(matches!(
            tree.node(italic).kind,
            NodeKind::Tag {
                kind: TagKind::Italic,
                closed: false,
                ..
            }
        ));
    }

    #[test]
    fn test_closer_of_popped_tag_is_text() {
        let tree = parse("[b][i]x[/b][/i]", false);
        let root = &tree.node(Tree::ROOT).children;
        assert_eq!(root.len(), 2);
        assert_eq!(tree.node(root[1]).kind, NodeKind::Text("[/i]".to_owned()));
    }

    #[test]
    fn test_tokenize_stops_at_next_bracket() {
        assert_eq!(
            tokenize("[b[/b]", false),
            [
                Token::Text("[b"),
                Token::Close {
                    kind: TagKind::Bold,
                    source: "[/b]"
                }
            ]
        );
    }

    #[test]
    fn test_parse_literal_content() {
        let tree = parse("[code][b]x[/b][/code]", false);
        let code = tree.node(Tree::ROOT).children[0];
        assert_eq!(tree.node(code).children.len(), 1);
        let text = tree.node(code).children[0];
        assert_eq!(tree.node(text).kind, NodeKind::Text("[b]x[/b]".to_owned()));
    }

    #[test]
    fn test_parse_pre_only_at_top_level() {
        let tree = parse("[b][pre]x[/pre][/b]", false);
        let bold = tree.node(Tree::ROOT).children[0];
        let text = tree.node(bold).children[0];
        assert_eq!(tree.node(text).kind, NodeKind::Text("[pre]x[/pre]".to_owned()));
    }
}
