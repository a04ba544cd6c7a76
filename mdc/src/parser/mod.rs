pub mod adapter;
pub mod builder;
pub mod error;

pub use error::ParseError;

use log::debug;

use crate::CommandTree;
use crate::language::LanguageRegistry;
use crate::parser::adapter::block_events;
use crate::parser::builder::TreeBuilder;

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
    catch_all: bool,
    registry: LanguageRegistry,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser {
            source,
            file_id,
            catch_all: false,
            registry: LanguageRegistry::default(),
        }
    }

    /// Keep code blocks of every language, not just registered ones.
    pub fn catch_all(mut self, catch_all: bool) -> Self {
        self.catch_all = catch_all;
        self
    }

    pub fn with_registry(mut self, registry: LanguageRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Parse the whole document into a command tree.
    pub fn parse(&self) -> Result<CommandTree, Vec<ParseError>> {
        if self.source.trim().is_empty() {
            return Err(vec![ParseError::error(
                "document is empty",
                0..self.source.len(),
                self.file_id,
            )]);
        }

        let mut builder = TreeBuilder::new(self.file_id, &self.registry, self.catch_all);
        for (event, span) in block_events(&self.source) {
            builder.handle(event, span);
        }
        let tree = builder.finish();
        debug!(
            "parsed {} heading(s), {} warning(s)",
            tree.len(),
            tree.warnings.len()
        );
        Ok(tree)
    }
}
