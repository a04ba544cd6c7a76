use log::debug;
use thiserror::Error;

use crate::CommandTree;
use crate::node::NodeId;

/// How a multi-segment heading path is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathMatch {
    /// Every segment must name one level of the tree, from the top-level
    /// headings down.
    #[default]
    Strict,
    /// Only the last segment is matched, anywhere below a top-level
    /// heading. The other segments only appear in error messages.
    Loose,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("cannot find heading: {0}")]
    NotFound(String),
    #[error("cannot find heading path: {}", .0.join(" > "))]
    PathNotFound(Vec<String>),
    #[error("no heading given")]
    EmptyPath,
}

/// Resolve a heading path. A single segment searches the whole tree.
///
/// On success the found node's `next` link is severed, so rendering from
/// it never continues into later siblings.
pub fn resolve<S: AsRef<str>>(
    tree: &mut CommandTree,
    path: &[S],
    mode: PathMatch,
) -> Result<NodeId, ResolveError> {
    match path {
        [] => Err(ResolveError::EmptyPath),
        [name] => find_by_name(tree, name.as_ref())
            .ok_or_else(|| ResolveError::NotFound(name.as_ref().to_string())),
        _ => find_by_path(tree, path, mode).ok_or_else(|| {
            ResolveError::PathNotFound(path.iter().map(|s| s.as_ref().to_string()).collect())
        }),
    }
}

/// Pre-order search of the whole tree for the first case-insensitive
/// name match.
pub fn find_by_name(tree: &mut CommandTree, name: &str) -> Option<NodeId> {
    let found = search_chain(tree, tree.root(), name)?;
    debug!("found node '{}' ({})", tree.node(found).name, found);
    tree.sever_next(found);
    Some(found)
}

/// Look up a node by heading path.
pub fn find_by_path<S: AsRef<str>>(
    tree: &mut CommandTree,
    path: &[S],
    mode: PathMatch,
) -> Option<NodeId> {
    let view: &CommandTree = tree;
    let found = match mode {
        PathMatch::Strict => match_segments(view, view.root(), path),
        PathMatch::Loose => {
            let last = path.last()?.as_ref();
            view.roots()
                .find_map(|root| search_chain(view, view.node(root).child(), last))
        }
    }?;
    debug!("found node '{}' ({}) by path", tree.node(found).name, found);
    tree.sever_next(found);
    Some(found)
}

/// Search `first` and its siblings, descending into each node's children
/// before moving on to the next sibling.
fn search_chain(tree: &CommandTree, first: Option<NodeId>, name: &str) -> Option<NodeId> {
    for id in tree.chain(first) {
        if tree.node(id).matches(name) {
            return Some(id);
        }
        if let Some(found) = search_chain(tree, tree.node(id).child(), name) {
            return Some(found);
        }
    }
    None
}

fn match_segments<S: AsRef<str>>(
    tree: &CommandTree,
    first: Option<NodeId>,
    path: &[S],
) -> Option<NodeId> {
    let (head, rest) = path.split_first()?;
    for id in tree.chain(first) {
        if !tree.node(id).matches(head.as_ref()) {
            continue;
        }
        if rest.is_empty() {
            return Some(id);
        }
        if let Some(found) = match_segments(tree, tree.node(id).child(), rest) {
            return Some(found);
        }
    }
    None
}
