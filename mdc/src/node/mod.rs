pub mod table;

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

/// Index of a node inside a [`CommandTree`](crate::CommandTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        NodeId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A command defined by a Markdown heading.
#[derive(Debug, Clone)]
pub struct Node {
    /// Heading level: 1 = top-level (#), 2-6 = subcommands (##-######).
    pub level: u8,
    /// Heading text as written in the source.
    pub name: String,
    /// First top-level paragraph seen before any code block.
    pub description: Option<String>,
    /// Runnable code, in document order.
    pub code_blocks: Vec<CodeBlock>,
    /// Environment assignments, in document order.
    pub env: Vec<EnvEntry>,
    /// Byte span of the heading in source for error reporting.
    pub span: Range<usize>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) child: Option<NodeId>,
}

impl Node {
    pub fn new(level: u8, name: impl Into<String>, span: Range<usize>) -> Self {
        Node {
            level,
            name: name.into(),
            description: None,
            code_blocks: Vec::new(),
            env: Vec::new(),
            span,
            parent: None,
            next: None,
            child: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    pub fn child(&self) -> Option<NodeId> {
        self.child
    }

    /// The name as typed on the command line. Subcommands are lower-case;
    /// top-level headings keep the case they were written in.
    pub fn command_name(&self) -> Cow<'_, str> {
        if self.level > 1 {
            Cow::Owned(self.name.to_lowercase())
        } else {
            Cow::Borrowed(&self.name)
        }
    }

    /// True when the node has something to run or something below it.
    pub fn is_command(&self) -> bool {
        !self.code_blocks.is_empty() || self.child.is_some()
    }

    /// Case-insensitive name comparison used for invocation.
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase() == query.to_lowercase()
    }
}

/// A fenced code block attached to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language tag: the first word of the fence's info string.
    pub language: String,
    pub source: String,
}

/// One environment assignment. `value: None` removes the variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub key: String,
    pub value: Option<String>,
}

impl EnvEntry {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        EnvEntry {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    pub fn unset(key: impl Into<String>) -> Self {
        EnvEntry {
            key: key.into(),
            value: None,
        }
    }
}

impl fmt::Display for EnvEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.key, value),
            None => write!(f, "-{}", self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_name_lowercases_subcommands_only() {
        let top = Node::new(1, "Build", 0..0);
        let sub = Node::new(2, "Release", 0..0);
        assert_eq!(top.command_name(), "Build");
        assert_eq!(sub.command_name(), "release");
        assert_eq!(sub.name, "Release");
    }

    #[test]
    fn matches_ignores_case() {
        let node = Node::new(2, "Déployer", 0..0);
        assert!(node.matches("DÉPLOYER"));
        assert!(!node.matches("deploy"));
    }

    #[test]
    fn env_entry_display() {
        assert_eq!(EnvEntry::set("A", "1").to_string(), "A=1");
        assert_eq!(EnvEntry::unset("A").to_string(), "-A");
    }
}
