use std::fmt;

use crate::CommandTree;
use crate::node::{CodeBlock, EnvEntry, Node, NodeId};

/// Markdown source for a node, its subcommands and its following
/// siblings. Parsing the output yields an equivalent tree.
pub struct Markdown<'a> {
    tree: &'a CommandTree,
    start: Option<NodeId>,
}

/// Reflect the tree back to Markdown starting at `start`.
pub fn markdown(tree: &CommandTree, start: Option<NodeId>) -> Markdown<'_> {
    Markdown { tree, start }
}

impl fmt::Display for Markdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_chain(self.tree, self.start, f)
    }
}

fn write_chain(tree: &CommandTree, first: Option<NodeId>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for id in tree.chain(first) {
        let node = tree.node(id);
        write_node(node, f)?;
        write_chain(tree, node.child(), f)?;
    }
    Ok(())
}

fn write_node(node: &Node, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{} {}", "#".repeat(node.level as usize), escape(&node.name))?;
    writeln!(f)?;

    if let Some(description) = &node.description {
        writeln!(f, "{}", escape(description))?;
        writeln!(f)?;
    }

    write_env(&node.env, f)?;

    for block in &node.code_blocks {
        write_code(block, f)?;
    }
    Ok(())
}

/// Set entries become `key | value` tables, unset entries become
/// unchecked task items. Runs of each kind keep their relative order.
fn write_env(env: &[EnvEntry], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut rest = env;
    while let Some(first) = rest.first() {
        let is_set = first.value.is_some();
        let run = rest
            .iter()
            .take_while(|e| e.value.is_some() == is_set)
            .count();
        let (group, tail) = rest.split_at(run);

        if is_set {
            writeln!(f, "|key|value|")?;
            writeln!(f, "|---|---|")?;
            for entry in group {
                let value = entry.value.as_deref().unwrap_or_default();
                writeln!(f, "|{}|{}|", escape(&entry.key), escape(value))?;
            }
        } else {
            for entry in group {
                writeln!(f, "- [ ] {}", escape(&entry.key))?;
            }
        }
        writeln!(f)?;
        rest = tail;
    }
    Ok(())
}

fn write_code(block: &CodeBlock, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let fence = fence_for(&block.source);
    writeln!(f, "{}{}", fence, block.language)?;
    write!(f, "{}", block.source)?;
    if !block.source.is_empty() && !block.source.ends_with('\n') {
        writeln!(f)?;
    }
    writeln!(f, "{}", fence)?;
    writeln!(f)
}

/// A backtick fence longer than any fence-like run inside the code.
fn fence_for(source: &str) -> String {
    let longest = source
        .lines()
        .map(|line| line.trim_start().chars().take_while(|&c| c == '`').count())
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

/// Punctuation that can open inline markup, an HTML tag, an entity or a
/// table cell boundary anywhere in a line.
const INLINE_SPECIALS: &[char] = &[
    '\\', '`', '*', '_', '[', ']', '<', '>', '#', '|', '~', '!', '&',
];

/// Backslash-escape plain text so it parses back to the same text.
///
/// Besides the inline specials, each line is guarded against starting a
/// block: bullet markers, setext underlines and ordered-list numbers.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
        }
        escape_line(line, &mut out);
    }
    out
}

fn escape_line(line: &str, out: &mut String) {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    let numbered = (1..=9).contains(&digits)
        && matches!(line.as_bytes().get(digits), Some(b'.' | b')'));

    for (at, c) in line.char_indices() {
        let block_start = at == 0 && matches!(c, '-' | '+' | '=');
        let list_delimiter = numbered && at == digits;
        if block_start || list_delimiter || INLINE_SPECIALS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}
