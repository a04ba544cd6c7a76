use log::{debug, info};
use mdc::CommandTree;
use mdc::language::LanguageRegistry;
use mdc::node::NodeId;

use crate::environment::Environment;
use crate::error::ExecError;
use crate::process::{Invocation, ProcessRunner};

/// Run every code block of a node, in order, stopping at the first one
/// that fails.
///
/// The node's environment is `base` overlaid with the entries of its
/// ancestors and itself. `args` follow each interpreter's fixed
/// arguments. Returns the last exit code seen, or 0 when the node has no
/// code.
pub fn execute_node(
    tree: &CommandTree,
    id: NodeId,
    args: &[String],
    registry: &LanguageRegistry,
    base: &Environment,
    runner: &mut dyn ProcessRunner,
) -> Result<i32, ExecError> {
    let node = tree.node(id);
    info!(
        "executing '{}' ({} code block(s), {} arg(s))",
        node.name,
        node.code_blocks.len(),
        args.len()
    );

    let env = Environment::for_node(tree, id, base.clone());

    let mut status = 0;
    for (index, block) in node.code_blocks.iter().enumerate() {
        let language = registry
            .lookup(&block.language)
            .ok_or_else(|| ExecError::UnsupportedLanguage(block.language.clone()))?;
        debug!("block {} runs as '{}'", index, language.name);

        let invocation = Invocation::from_argv(language.argv(&block.source, args))
            .ok_or_else(|| ExecError::UnsupportedLanguage(block.language.clone()))?;
        status = runner.run(&invocation, &env)?;
        if status != 0 {
            info!("block {} exited with {}, skipping the rest", index, status);
            break;
        }
    }
    Ok(status)
}
