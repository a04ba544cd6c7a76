use crate::CommandTree;
use crate::display_tree::DisplayTree;
use crate::node::{Node, NodeId};

/// Columns of indentation per tree depth in the rendered output.
const INDENT: usize = 4;

/// Render the command overview: one tree per top-level heading, listing
/// every subcommand that has code or subcommands of its own.
///
/// Descriptions are aligned to a single column shared by all trees, two
/// spaces past the widest name line.
pub fn render_hints(tree: &CommandTree) -> String {
    let width = tree
        .roots()
        .flat_map(|root| {
            project(tree, root, None)
                .render()
                .lines()
                .map(display_width)
                .collect::<Vec<_>>()
        })
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for root in tree.roots() {
        out.push_str(&project(tree, root, Some(width)).render());
        out.push('\n');
    }
    out
}

/// Display width in terminal columns. Counts characters, so UTF-8
/// continuation bytes do not widen a line.
fn display_width(line: &str) -> usize {
    line.chars().count()
}

fn project(tree: &CommandTree, root: NodeId, width: Option<usize>) -> DisplayTree {
    let mut display = DisplayTree::new(tree.node(root).command_name());
    attach(tree, root, &mut display, 1, width);
    display
}

fn attach(
    tree: &CommandTree,
    parent: NodeId,
    display: &mut DisplayTree,
    depth: usize,
    width: Option<usize>,
) {
    for id in tree.children(parent) {
        let node = tree.node(id);
        if !node.is_command() {
            continue;
        }
        let label = match width {
            None => node.command_name().into_owned(),
            Some(width) => aligned_label(node, depth, width),
        };
        let child = display.push(DisplayTree::new(label));
        attach(tree, id, child, depth + 1, width);
    }
}

fn aligned_label(node: &Node, depth: usize, width: usize) -> String {
    let name = node.command_name();
    let description = node
        .description
        .as_deref()
        .and_then(|d| d.lines().next())
        .unwrap_or("");
    if description.is_empty() {
        return name.into_owned();
    }
    let pad = width.saturating_sub(display_width(&name) + depth * INDENT);
    format!("{}{}  {}", name, " ".repeat(pad), description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> CommandTree {
        Parser::new(source.to_string(), 0).parse().expect("parse")
    }

    #[test]
    fn aligns_descriptions_and_omits_description_only_leaves() {
        let tree = parse(
            "# Build\nBuild things.\n\n\
             ## Debug\nDebug build.\n\n```sh\necho d\n```\n\n\
             ## Release\n```sh\necho r\n```\n\n\
             ### Strip\nStrip symbols.\n\n```sh\necho s\n```\n\n\
             ## Notes\nJust notes.\n\n\
             # Deploy\n",
        );

        let expected = [
            "Build",
            "├── debug      Debug build.",
            "└── release",
            "    └── strip  Strip symbols.",
            "",
            "Deploy",
            "",
            "",
        ]
        .join("\n");
        assert_eq!(render_hints(&tree), expected);
    }

    #[test]
    fn multibyte_names_do_not_shift_the_description_column() {
        let tree = parse(
            "# Tools\n\
             ## Übersetzen\nTranslate.\n\n```sh\ntrue\n```\n\n\
             ## ab\nShort.\n\n```sh\ntrue\n```\n",
        );
        let rendered = render_hints(&tree);
        let columns: Vec<usize> = rendered
            .lines()
            .filter_map(|line| {
                let byte = line.find("  ")?;
                let desc = line[byte..].trim_start();
                let at = line.len() - desc.len();
                Some(line[..at].chars().count())
            })
            .collect();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0], columns[1]);
        assert!(rendered.contains("übersetzen"));
    }

    #[test]
    fn top_level_names_keep_their_case() {
        let tree = parse("# MyTool\n## Sub Cmd\n```sh\ntrue\n```\n");
        let rendered = render_hints(&tree);
        assert!(rendered.starts_with("MyTool\n"));
        assert!(rendered.contains("└── sub cmd"));
    }

    #[test]
    fn empty_tree_renders_nothing() {
        let tree = CommandTree::new(0);
        assert_eq!(render_hints(&tree), "");
    }
}
