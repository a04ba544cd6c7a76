pub mod display_tree;
pub mod hint;
pub mod language;
pub mod markdown;
pub mod node;
pub mod parser;
pub mod resolve;

use crate::node::{Node, NodeId};
use crate::parser::ParseError;

/// A parsed command document.
///
/// Nodes live in an arena and refer to each other by [`NodeId`]. The
/// top-level forest is the `next` chain starting at `root`.
#[derive(Debug, Clone)]
pub struct CommandTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
    /// Non-fatal diagnostics collected while building the tree.
    pub warnings: Vec<ParseError>,
}

impl CommandTree {
    pub fn new(source_id: usize) -> Self {
        CommandTree {
            nodes: Vec::new(),
            root: None,
            source_id,
            warnings: Vec::new(),
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes in the arena, including unreachable ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Top-level nodes, in document order.
    pub fn roots(&self) -> Siblings<'_> {
        self.chain(self.root)
    }

    /// Direct children of `id`, in document order.
    pub fn children(&self, id: NodeId) -> Siblings<'_> {
        self.chain(self.node(id).child())
    }

    /// Walk a `next` chain starting at `first`.
    pub fn chain(&self, first: Option<NodeId>) -> Siblings<'_> {
        Siblings {
            tree: self,
            current: first,
        }
    }

    /// The node itself followed by each parent, deepest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: Some(id),
        }
    }

    /// Cut the sibling link after `id` so anything following it is no
    /// longer reachable through this node.
    pub fn sever_next(&mut self, id: NodeId) {
        self.node_mut(id).next = None;
    }
}

/// Iterator over a `next` chain.
pub struct Siblings<'a> {
    tree: &'a CommandTree,
    current: Option<NodeId>,
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.node(id).next();
        Some(id)
    }
}

/// Iterator over a `parent` chain.
pub struct Ancestors<'a> {
    tree: &'a CommandTree,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.node(id).parent();
        Some(id)
    }
}
