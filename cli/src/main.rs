mod config;
mod discover;
mod logging;
mod test_runner;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use log::{debug, info};

use executor::{Environment, InheritRunner};
use mdc::hint::render_hints;
use mdc::language::LanguageRegistry;
use mdc::markdown::markdown;
use mdc::parser::{ParseError, Parser};
use mdc::resolve::resolve;

use crate::config::Config;

fn main() {
    let argv: Vec<String> = std::env::args().collect();
    let config = Config::from_args(&argv);
    logging::init(&config.program, config.verbose);

    let code = match &config.test {
        Some(path) if config.list_categories => {
            test_runner::list_categories(path);
            0
        }
        Some(path) => test_runner::run_tests(path, config.no_color, &config.categories),
        None => run(&config),
    };

    let _ = io::stdout().flush();
    process::exit(code);
}

/// Print one error line in the `<program>:error:` style.
fn fail(config: &Config, message: impl std::fmt::Display) -> i32 {
    eprintln!("{}:error: {}", config.program, message);
    1
}

fn locate(config: &Config) -> Option<PathBuf> {
    if let Some(file) = &config.file {
        return Some(file.clone());
    }
    let cwd = std::env::current_dir().ok()?;
    discover::find_document(&config.program, &cwd)
}

fn run(config: &Config) -> i32 {
    let Some(path) = locate(config) else {
        return fail(config, "no markdown file found");
    };
    info!("using markdown file: {}", path.display());

    let source = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => return fail(config, format!("cannot read '{}': {}", path.display(), e)),
    };

    let color_choice = if config.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(path.display().to_string(), source.clone());

    let registry = LanguageRegistry::default();
    debug!(
        "runnable languages: {}",
        registry.names().collect::<Vec<_>>().join(", ")
    );
    let parser = Parser::new(source, file_id)
        .catch_all(config.all)
        .with_registry(registry.clone());
    let mut tree = match parser.parse() {
        Ok(tree) => tree,
        Err(errors) => {
            emit_diagnostics(color_choice, &files, &errors, config.verbose);
            return 1;
        }
    };
    emit_diagnostics(color_choice, &files, &tree.warnings, config.verbose);

    let target = &config.target;
    if target.is_empty() {
        info!("no heading given, printing hints");
        if config.markdown {
            print!("{}", markdown(&tree, tree.root()));
        } else {
            print!("{}", render_hints(&tree));
        }
        return 0;
    }

    debug!(
        "heading path: {:?}, {} argument(s)",
        target.path,
        target.args.len()
    );
    let id = match resolve(&mut tree, target.path.as_slice(), config.path_match) {
        Ok(id) => id,
        Err(e) => return fail(config, e),
    };
    info!("found node: {}", tree.node(id).name);

    if config.markdown || config.code {
        if config.markdown {
            print!("{}", markdown(&tree, Some(id)));
        }
        if config.code {
            for block in &tree.node(id).code_blocks {
                print!("{}", block.source);
            }
        }
        return 0;
    }

    let mut env = Environment::new();
    env.set("MD_FILE", path.display().to_string());
    env.set("MD_EXE", config.exe.clone());

    match executor::execute_node(
        &tree,
        id,
        &target.args,
        &registry,
        &env,
        &mut InheritRunner,
    ) {
        Ok(code) => code,
        Err(e) => fail(config, e),
    }
}

fn emit_diagnostics(
    color_choice: ColorChoice,
    files: &SimpleFiles<String, String>,
    errors: &[ParseError],
    verbose: bool,
) {
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    // Warnings only with -v.
    for error in errors.iter().filter(|e| verbose || !e.is_warning()) {
        let diagnostic = error.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &diagnostic);
    }
}
