//! Arena-allocated tag tree.
//!
//! Nodes refer to their parent by index, so the nesting context of every
//! node comes from one forward pass without any shared ownership.

use super::tag::TagKind;

pub(crate) type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Root,
    Text(String),
    Tag {
        kind: TagKind,
        /// Opening tag as written, rendered when the tag is never closed.
        source: String,
        closed: bool,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Closed tags enclosing a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Nesting {
    pub closed_ancestors: usize,
    /// Whether one of them is a subscript or superscript.
    pub inside_script: bool,
}

impl Nesting {
    /// Nesting depth of a tag in this context: 1 at the top level.
    pub fn depth(self) -> usize {
        self.closed_ancestors + 1
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub const ROOT: NodeId = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Kind of a tag node, `None` for the root and text.
    pub fn tag_kind(&self, id: NodeId) -> Option<TagKind> {
        match self.nodes[id].kind {
            NodeKind::Tag { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Whether a tag of `kind` may open directly inside `parent`.
    pub fn accepts(&self, parent: NodeId, kind: TagKind) -> bool {
        match self.nodes[parent].kind {
            NodeKind::Root => true,
            NodeKind::Tag { kind: parent, .. } => parent.accepts(kind),
            NodeKind::Text(_) => false,
        }
    }

    /// Append text to `parent`, merging with a preceding text child.
    pub fn push_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.nodes[parent].children.last()
            && let NodeKind::Text(existing) = &mut self.nodes[last].kind
        {
            existing.push_str(text);
            return;
        }
        self.push(parent, NodeKind::Text(text.to_owned()));
    }

    pub fn push_tag(&mut self, parent: NodeId, kind: TagKind, source: &str) -> NodeId {
        self.push(
            parent,
            NodeKind::Tag {
                kind,
                source: source.to_owned(),
                closed: false,
            },
        )
    }

    pub fn close(&mut self, id: NodeId) {
        if let NodeKind::Tag { closed, .. } = &mut self.nodes[id].kind {
            *closed = true;
        }
    }

    /// Closed-tag context of every node, indexed by [`NodeId`].
    ///
    /// Parents are always pushed before their children, so one pass in id
    /// order sees each parent's context before its children need it.
    pub fn nesting(&self) -> Vec<Nesting> {
        let mut nesting = vec![Nesting::default(); self.nodes.len()];
        for (id, node) in self.nodes.iter().enumerate() {
            let Some(parent) = node.parent else { continue };
            let mut context = nesting[parent];
            if let NodeKind::Tag {
                kind, closed: true, ..
            } = self.nodes[parent].kind
            {
                context.closed_ancestors += 1;
                context.inside_script |= kind.is_script();
            }
            nesting[id] = context;
        }
        nesting
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }
}
