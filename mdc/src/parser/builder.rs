use std::ops::Range;

use log::debug;

use crate::CommandTree;
use crate::language::LanguageRegistry;
use crate::node::table::Table;
use crate::node::{CodeBlock, EnvEntry, Node, NodeId};
use crate::parser::adapter::BlockEvent;
use crate::parser::error::ParseError;

/// Assembles a [`CommandTree`] from block events in document order.
pub struct TreeBuilder<'r> {
    tree: CommandTree,
    registry: &'r LanguageRegistry,
    catch_all: bool,
    /// Most recently closed heading. Everything between two headings
    /// attaches here.
    last: Option<NodeId>,
}

impl<'r> TreeBuilder<'r> {
    pub fn new(file_id: usize, registry: &'r LanguageRegistry, catch_all: bool) -> Self {
        TreeBuilder {
            tree: CommandTree::new(file_id),
            registry,
            catch_all,
            last: None,
        }
    }

    pub fn handle(&mut self, event: BlockEvent, span: Range<usize>) {
        match event {
            BlockEvent::Heading { level, text } => self.heading(level, text, span),
            BlockEvent::Paragraph { text, nested } => {
                if !nested {
                    self.paragraph(text);
                }
            }
            BlockEvent::CodeBlock { info, content } => self.code_block(&info, content),
            BlockEvent::TaskItem { checked, text } => {
                let value = checked.then(|| "1".to_string());
                self.push_env(EnvEntry { key: text, value });
            }
            BlockEvent::Table(table) => self.table(&table),
        }
    }

    pub fn finish(self) -> CommandTree {
        self.tree
    }

    fn heading(&mut self, level: u8, text: String, span: Range<usize>) {
        let id = self.tree.push(Node::new(level, text, span.clone()));

        match self.last {
            None => self.tree.set_root(id),
            Some(last) => self.link(last, id, level, span),
        }

        self.last = Some(id);
    }

    /// Place `id` relative to the previous heading `last`.
    fn link(&mut self, last: NodeId, id: NodeId, level: u8, span: Range<usize>) {
        let last_level = self.tree.node(last).level;

        if level == last_level {
            let parent = self.tree.node(last).parent;
            self.tree.node_mut(last).next = Some(id);
            self.tree.node_mut(id).parent = parent;
        } else if level > last_level {
            self.tree.node_mut(last).child = Some(id);
            self.tree.node_mut(id).parent = Some(last);
        } else {
            let mut ancestor = self.tree.node(last).parent;
            while let Some(candidate) = ancestor {
                if self.tree.node(candidate).level == level {
                    let grandparent = self.tree.node(candidate).parent;
                    self.tree.node_mut(candidate).next = Some(id);
                    self.tree.node_mut(id).parent = grandparent;
                    return;
                }
                ancestor = self.tree.node(candidate).parent;
            }

            let name = self.tree.node(id).name.clone();
            debug!("dropping heading '{}': no enclosing level-{} heading", name, level);
            let warning = ParseError::warning(
                format!("heading '{}' is unreachable", name),
                span,
                self.tree.source_id,
            )
            .with_note(format!(
                "no heading at level {} encloses it, so it is not attached to the tree",
                level
            ));
            self.tree.warnings.push(warning);
        }
    }

    fn paragraph(&mut self, text: String) {
        let Some(last) = self.last else {
            return;
        };
        let node = self.tree.node_mut(last);
        if node.code_blocks.is_empty() {
            node.description = Some(text);
        }
    }

    fn code_block(&mut self, info: &str, content: String) {
        let Some(last) = self.last else {
            return;
        };
        let language = info.split_whitespace().next().unwrap_or("");

        if self.catch_all || self.registry.is_registered(language) {
            self.tree.node_mut(last).code_blocks.push(CodeBlock {
                language: language.to_string(),
                source: content,
            });
        } else {
            debug!(
                "skipping code block with unregistered language '{}' under '{}'",
                language,
                self.tree.node(last).name
            );
        }
    }

    fn table(&mut self, table: &Table) {
        if let Some(entries) = table.env_entries() {
            for entry in entries {
                self.push_env(entry);
            }
        }
    }

    fn push_env(&mut self, entry: EnvEntry) {
        let Some(last) = self.last else {
            return;
        };
        if entry.key.is_empty() {
            debug!("skipping environment entry with an empty key");
            return;
        }
        self.tree.node_mut(last).env.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn heading(level: u8, text: &str) -> BlockEvent {
        BlockEvent::Heading {
            level,
            text: text.into(),
        }
    }

    fn build(events: Vec<BlockEvent>) -> CommandTree {
        let registry = LanguageRegistry::default();
        let mut builder = TreeBuilder::new(0, &registry, false);
        for event in events {
            builder.handle(event, 0..0);
        }
        builder.finish()
    }

    fn names(tree: &CommandTree, ids: impl Iterator<Item = NodeId>) -> Vec<String> {
        ids.map(|id| tree.node(id).name.clone()).collect()
    }

    #[test]
    fn first_heading_becomes_root() {
        let tree = build(vec![heading(2, "Start")]);
        let root = tree.root().expect("root");
        assert_eq!(tree.node(root).name, "Start");
        assert_eq!(tree.node(root).parent(), None);
    }

    #[test]
    fn deeper_heading_becomes_child_and_sibling_returns_to_parent() {
        let tree = build(vec![
            heading(1, "H1"),
            heading(2, "H2"),
            heading(3, "H3"),
            heading(2, "H2b"),
        ]);
        let h1 = tree.root().unwrap();
        let h2 = tree.node(h1).child().unwrap();
        let h3 = tree.node(h2).child().unwrap();
        let h2b = tree.node(h2).next().unwrap();

        assert_eq!(tree.node(h3).name, "H3");
        assert_eq!(tree.node(h2b).name, "H2b");
        assert_eq!(tree.node(h2b).parent(), Some(h1));
        assert_eq!(names(&tree, tree.children(h1)), vec!["H2", "H2b"]);
    }

    #[test]
    fn skipped_level_still_attaches_as_child() {
        let tree = build(vec![heading(1, "Top"), heading(3, "Deep")]);
        let top = tree.root().unwrap();
        let deep = tree.node(top).child().unwrap();
        assert_eq!(tree.node(deep).level, 3);
        assert_eq!(tree.node(deep).parent(), Some(top));
    }

    #[test]
    fn heading_without_matching_ancestor_is_dropped() {
        let tree = build(vec![
            heading(1, "Top"),
            heading(3, "Deep"),
            heading(2, "Lost"),
            heading(3, "LostChild"),
        ]);
        let top = tree.root().unwrap();

        assert_eq!(tree.len(), 4);
        assert_eq!(names(&tree, tree.roots()), vec!["Top"]);
        assert_eq!(names(&tree, tree.children(top)), vec!["Deep"]);
        assert_eq!(tree.node(NodeId::new(2)).parent(), None);
        // The orphan keeps collecting content of its own.
        assert_eq!(tree.node(NodeId::new(2)).child(), Some(NodeId::new(3)));
        assert_eq!(tree.warnings.len(), 1);
        assert!(tree.warnings[0].message.contains("Lost"));
    }

    #[test]
    fn shallower_than_root_is_dropped() {
        let tree = build(vec![heading(2, "Sub"), heading(1, "Top")]);
        assert_eq!(names(&tree, tree.roots()), vec!["Sub"]);
        assert_eq!(tree.warnings.len(), 1);
    }

    #[test]
    fn description_is_taken_until_first_code_block() {
        let tree = build(vec![
            heading(1, "Cmd"),
            BlockEvent::Paragraph {
                text: "one".into(),
                nested: false,
            },
            BlockEvent::Paragraph {
                text: "two".into(),
                nested: false,
            },
            BlockEvent::CodeBlock {
                info: "sh".into(),
                content: "true\n".into(),
            },
            BlockEvent::Paragraph {
                text: "after".into(),
                nested: false,
            },
        ]);
        let node = tree.node(tree.root().unwrap());
        assert_eq!(node.description.as_deref(), Some("two"));
    }

    #[test]
    fn nested_paragraphs_are_not_descriptions() {
        let tree = build(vec![
            heading(1, "Cmd"),
            BlockEvent::Paragraph {
                text: "in a list".into(),
                nested: true,
            },
        ]);
        assert_eq!(tree.node(tree.root().unwrap()).description, None);
    }

    #[test]
    fn unregistered_code_is_skipped_unless_catch_all() {
        let events = || {
            vec![
                heading(1, "Cmd"),
                BlockEvent::CodeBlock {
                    info: "rust".into(),
                    content: "fn main() {}\n".into(),
                },
                BlockEvent::CodeBlock {
                    info: "Bash extra".into(),
                    content: "echo\n".into(),
                },
            ]
        };

        let tree = build(events());
        let node = tree.node(tree.root().unwrap());
        assert_eq!(node.code_blocks.len(), 1);
        assert_eq!(node.code_blocks[0].language, "Bash");

        let registry = LanguageRegistry::default();
        let mut builder = TreeBuilder::new(0, &registry, true);
        for event in events() {
            builder.handle(event, 0..0);
        }
        let tree = builder.finish();
        let node = tree.node(tree.root().unwrap());
        assert_eq!(node.code_blocks.len(), 2);
        assert_eq!(node.code_blocks[0].language, "rust");
    }

    #[test]
    fn env_entries_append_from_tasks_and_tables() {
        let tree = build(vec![
            heading(1, "Cmd"),
            BlockEvent::TaskItem {
                checked: true,
                text: "FOO".into(),
            },
            BlockEvent::Table(Table {
                columns: 2,
                head: vec![vec!["key".into(), "value".into()]],
                body: vec![vec!["X".into(), "Y".into()]],
            }),
            BlockEvent::TaskItem {
                checked: false,
                text: "FOO".into(),
            },
        ]);
        let node = tree.node(tree.root().unwrap());
        assert_eq!(
            node.env,
            vec![
                EnvEntry::set("FOO", "1"),
                EnvEntry::set("X", "Y"),
                EnvEntry::unset("FOO"),
            ]
        );
    }

    #[test]
    fn content_before_first_heading_is_ignored() {
        let tree = build(vec![
            BlockEvent::Paragraph {
                text: "intro".into(),
                nested: false,
            },
            BlockEvent::TaskItem {
                checked: true,
                text: "FOO".into(),
            },
            heading(1, "Cmd"),
        ]);
        let node = tree.node(tree.root().unwrap());
        assert_eq!(node.description, None);
        assert!(node.env.is_empty());
    }
}
