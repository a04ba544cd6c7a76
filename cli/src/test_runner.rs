use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use executor::{CaptureRunner, Environment, execute_node};
use mdc::hint::render_hints;
use mdc::language::LanguageRegistry;
use mdc::parser::Parser;
use mdc::resolve::{PathMatch, resolve};

/// Front matter of a `.test.md` file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestConfig {
    /// Human-readable test description.
    pub description: Option<String>,

    /// Heading path to run. Empty renders the hint tree instead.
    pub command: Vec<String>,

    /// Arguments passed through to the code blocks.
    pub args: Vec<String>,

    /// Parse in catch-all mode.
    pub all: bool,

    /// Match `command` by its last segment only.
    pub loose: bool,

    /// Expected exit code. Defaults to 0 unless an error is expected.
    pub expect_exit: Option<i32>,

    /// Expected stdout, compared after trimming.
    pub expect_output: Option<String>,

    /// Substring of the expected parse, lookup or execution error.
    pub expect_error: Option<String>,
}

/// Split a `.test.md` file into its TOML front matter and the document.
fn split_front_matter(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}');
    let rest = content
        .strip_prefix("---")
        .ok_or("missing opening --- delimiter")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let close = rest.find("\n---").ok_or("missing closing --- delimiter")?;
    let front = rest[..close].trim_end_matches('\r');
    let after = &rest[close + "\n---".len()..];
    let document = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))
        .unwrap_or(after);

    let config: TestConfig = toml::from_str(front).map_err(|e| format!("TOML error: {}", e))?;
    Ok((config, document))
}

/// What running the document produced.
struct Observed {
    exit: i32,
    output: String,
    error: Option<String>,
}

impl Observed {
    fn failed(error: String) -> Self {
        Observed {
            exit: 1,
            output: String::new(),
            error: Some(error),
        }
    }
}

fn observe(path: &Path, config: &TestConfig, document: &str) -> Observed {
    let registry = LanguageRegistry::default();
    let parsed = Parser::new(document.to_string(), 0)
        .catch_all(config.all)
        .with_registry(registry.clone())
        .parse();
    let mut tree = match parsed {
        Ok(tree) => tree,
        Err(errors) => {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            return Observed::failed(messages.join("; "));
        }
    };

    if config.command.is_empty() {
        return Observed {
            exit: 0,
            output: render_hints(&tree),
            error: None,
        };
    }

    let mode = if config.loose {
        PathMatch::Loose
    } else {
        PathMatch::Strict
    };
    let id = match resolve(&mut tree, config.command.as_slice(), mode) {
        Ok(id) => id,
        Err(e) => return Observed::failed(e.to_string()),
    };

    let mut env = Environment::new();
    env.set("MD_FILE", path.display().to_string());
    let mut runner = CaptureRunner::new(Vec::new());
    let result = execute_node(&tree, id, &config.args, &registry, &env, &mut runner);
    let output = String::from_utf8_lossy(&runner.into_inner()).into_owned();
    match result {
        Ok(exit) => Observed {
            exit,
            output,
            error: None,
        },
        Err(e) => Observed {
            output,
            ..Observed::failed(e.to_string())
        },
    }
}

/// Compare observations with expectations. Returns the first mismatch.
fn check(config: &TestConfig, observed: &Observed) -> Option<String> {
    match (&config.expect_error, &observed.error) {
        (Some(expected), Some(actual)) if !actual.contains(expected.as_str()) => {
            return Some(format!(
                "expected error containing \"{}\", got: {}",
                expected, actual
            ));
        }
        (Some(expected), None) => {
            return Some(format!(
                "expected error containing \"{}\", but none occurred",
                expected
            ));
        }
        (None, Some(actual)) => return Some(format!("unexpected error: {}", actual)),
        _ => {}
    }

    let expect_exit = config
        .expect_exit
        .unwrap_or(if config.expect_error.is_some() { 1 } else { 0 });
    if observed.exit != expect_exit {
        return Some(format!(
            "expected exit code {}, got {}",
            expect_exit, observed.exit
        ));
    }

    if let Some(expected) = &config.expect_output {
        let (expected, actual) = (expected.trim(), observed.output.trim());
        if expected != actual {
            return Some(format!(
                "output mismatch\n  expected: {}\n  actual:   {}",
                expected, actual
            ));
        }
    }
    None
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

impl TestResult {
    fn label(&self) -> &str {
        self.description
            .as_deref()
            .or_else(|| self.path.file_stem().and_then(|s| s.to_str()))
            .unwrap_or("?")
    }
}

fn run_single_test(path: &Path) -> TestResult {
    let result = |description, outcome| TestResult {
        path: path.to_path_buf(),
        description,
        outcome,
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return result(None, TestOutcome::Fail(format!("cannot read file: {}", e))),
    };
    let (config, document) = match split_front_matter(&content) {
        Ok(pair) => pair,
        Err(e) => return result(None, TestOutcome::Fail(format!("front matter error: {}", e))),
    };

    let observed = observe(path, &config, document);
    let outcome = match check(&config, &observed) {
        None => TestOutcome::Pass,
        Some(reason) => TestOutcome::Fail(reason),
    };
    result(config.description, outcome)
}

/// `.test.md` files under `root`, keyed by sub-directory relative to it.
/// Files directly in `root` have the empty category.
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
            continue;
        }
        let is_test = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".test.md"));
        if is_test {
            let category = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            out.entry(category).or_default().push(path);
        }
    }
}

fn category_label(category: &str) -> &str {
    if category.is_empty() {
        "(root)"
    } else {
        category
    }
}

/// List available categories for the given test path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }
    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no .test.md files found in {}", path.display());
        return;
    }
    eprintln!("available categories:");
    for (category, files) in &categories {
        eprintln!("  {} ({} tests)", category_label(category), files.len());
    }
}

/// Terminal styling for the report.
struct Style {
    color: bool,
}

impl Style {
    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    fn pass(&self) -> String {
        self.paint("32", "PASS")
    }

    fn fail(&self) -> String {
        self.paint("31", "FAIL")
    }

    fn bold(&self, text: &str) -> String {
        self.paint("1", text)
    }
}

/// Select the categories to run. Unknown names are reported and skipped.
fn select<'a>(
    all: &'a BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<&'a str, &'a [PathBuf]> {
    if requested.is_empty() {
        return all.iter().map(|(k, v)| (k.as_str(), v.as_slice())).collect();
    }
    let mut selected = BTreeMap::new();
    for name in requested {
        let name = name.trim_matches('/');
        let nested = format!("{}/", name);
        let before = selected.len();
        for (category, files) in all {
            if category == name || category.starts_with(&nested) {
                selected.insert(category.as_str(), files.as_slice());
            }
        }
        if selected.len() == before {
            let available: Vec<&str> = all.keys().map(|k| category_label(k)).collect();
            eprintln!(
                "warning: category '{}' not found (available: {})",
                name,
                available.join(", ")
            );
        }
    }
    selected
}

/// Run all `.test.md` files under `path` (or a single file), optionally
/// limited to some categories. Returns 0 when everything passes.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let style = Style { color: !no_color };

    let groups: Vec<(String, Vec<PathBuf>)> = if path.is_file() {
        vec![(String::new(), vec![path.to_path_buf()])]
    } else {
        let all = discover_categorized(path);
        if all.is_empty() {
            eprintln!("no .test.md files found in {}", path.display());
            return 1;
        }
        let selected = select(&all, categories);
        if selected.is_empty() {
            eprintln!("no matching categories found");
            return 1;
        }
        selected
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_vec()))
            .collect()
    };

    let single = path.is_file();
    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (category, files) in &groups {
        if !single {
            eprintln!();
            eprintln!("{}", style.bold(category_label(category)));
        }
        for file in files {
            let result = run_single_test(file);
            match result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", style.pass(), result.label());
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", style.fail(), result.label());
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for failure in &failures {
            eprintln!();
            eprintln!("  --- {} ---", failure.path.display());
            if let TestOutcome::Fail(reason) = &failure.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    if failures.is_empty() {
        eprintln!("test result: {}. {} passed, 0 failed", style.paint("32", "ok"), passed);
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            style.paint("31", "FAILED"),
            passed,
            failures.len(),
            passed + failures.len()
        );
        1
    }
}
