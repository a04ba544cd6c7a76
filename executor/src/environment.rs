use std::process::Command;

use log::debug;
use mdc::CommandTree;
use mdc::node::{EnvEntry, NodeId};

/// Environment overrides for spawned code.
///
/// Each key is either set to a value or removed. Anything not mentioned
/// is inherited from the host process unchanged. Keys keep the position
/// of their first assignment; later assignments replace the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: Vec<(String, Option<String>)>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.assign(key.into(), Some(value.into()));
    }

    pub fn unset(&mut self, key: impl Into<String>) {
        self.assign(key.into(), None);
    }

    /// Apply one document entry on top of the current overrides.
    pub fn apply(&mut self, entry: &EnvEntry) {
        self.assign(entry.key.clone(), entry.value.clone());
    }

    fn assign(&mut self, key: String, value: Option<String>) {
        match self.vars.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.vars.push((key, value)),
        }
    }

    /// `base` with the entries of every ancestor of `id` replayed
    /// root-first, ending with the node's own. Deeper headings win.
    pub fn for_node(tree: &CommandTree, id: NodeId, base: Environment) -> Environment {
        let mut env = base;
        let lineage: Vec<NodeId> = tree.ancestors(id).collect();
        for ancestor in lineage.into_iter().rev() {
            for entry in &tree.node(ancestor).env {
                debug!("env {} (from '{}')", entry, tree.node(ancestor).name);
                env.apply(entry);
            }
        }
        env
    }

    /// The overridden value, if the key is set here.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).flatten()
    }

    /// True when the key is explicitly removed.
    pub fn is_unset(&self, key: &str) -> bool {
        matches!(self.get(key), Some(None))
    }

    fn get(&self, key: &str) -> Option<Option<&str>> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Configure a child process with these overrides.
    pub fn apply_to(&self, command: &mut Command) {
        for (key, value) in self.iter() {
            match value {
                Some(value) => {
                    command.env(key, value);
                }
                None => {
                    command.env_remove(key);
                }
            }
        }
    }
}
