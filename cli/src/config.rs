use std::path::{Path, PathBuf};

use clap::Parser;
use mdc::resolve::PathMatch;

#[derive(Parser, Debug)]
#[command(
    name = "mdc",
    version,
    about = "Run the code blocks under a Markdown heading",
    after_help = "Words before `--` name a heading path; words after it are passed to the code.\n\
                  Without `--`, the first word is the heading and the rest are passed on."
)]
pub struct Cli {
    /// Log each step to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the heading's Markdown instead of running it
    #[arg(short, long)]
    pub markdown: bool,

    /// Print the heading's code instead of running it
    #[arg(short, long)]
    pub code: bool,

    /// Accept code blocks of every language, not just known interpreters
    #[arg(short, long)]
    pub all: bool,

    /// Markdown document to use instead of searching for one
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Match a heading path by its last segment only
    #[arg(long)]
    pub loose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Run .test.md files from a file or directory
    #[arg(long, value_name = "PATH")]
    pub test: Option<PathBuf>,

    /// With --test: run only these categories (subfolder names). Repeatable.
    #[arg(long, requires = "test")]
    pub category: Vec<String>,

    /// With --test: list available categories and exit
    #[arg(long, requires = "test")]
    pub list_categories: bool,

    /// Heading followed by arguments for its code
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub words: Vec<String>,
}

/// The heading to act on and the arguments passed through to its code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
    pub path: Vec<String>,
    pub args: Vec<String>,
}

impl Target {
    /// `escaped` holds the words after a `--`, if one was given. With
    /// nothing before the `--`, the first escaped word is the heading.
    pub fn from_words(words: Vec<String>, escaped: Option<Vec<String>>) -> Self {
        match escaped {
            Some(args) if !words.is_empty() => Target { path: words, args },
            Some(args) => Target::heading_first(args),
            None => Target::heading_first(words),
        }
    }

    /// The first word names the heading; the rest are arguments.
    fn heading_first(mut words: Vec<String>) -> Self {
        if words.is_empty() {
            return Target::default();
        }
        let args = words.split_off(1);
        Target { path: words, args }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Everything one run needs to know, resolved from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    /// File stem of `argv[0]`; names the document to search for.
    pub program: String,
    /// `argv[0]` as given.
    pub exe: String,
    pub verbose: bool,
    pub markdown: bool,
    pub code: bool,
    pub all: bool,
    pub file: Option<PathBuf>,
    pub path_match: PathMatch,
    pub no_color: bool,
    pub test: Option<PathBuf>,
    pub categories: Vec<String>,
    pub list_categories: bool,
    pub target: Target,
}

impl Config {
    pub fn from_args(argv: &[String]) -> Self {
        let (flags, escaped) = split_escape(argv);
        let cli = Cli::parse_from(flags);
        let exe = argv.first().cloned().unwrap_or_default();
        Config::from_cli(cli, exe, escaped)
    }

    pub fn from_cli(cli: Cli, exe: String, escaped: Option<Vec<String>>) -> Self {
        Config {
            program: program_name(&exe),
            exe,
            verbose: cli.verbose,
            markdown: cli.markdown,
            code: cli.code,
            all: cli.all,
            file: cli.file,
            path_match: if cli.loose {
                PathMatch::Loose
            } else {
                PathMatch::Strict
            },
            no_color: cli.no_color,
            test: cli.test,
            categories: cli.category,
            list_categories: cli.list_categories,
            target: Target::from_words(cli.words, escaped),
        }
    }
}

/// Split argv at the first `--`. Only the part before it is parsed as
/// flags.
fn split_escape(argv: &[String]) -> (&[String], Option<Vec<String>>) {
    match argv.iter().position(|arg| arg == "--") {
        Some(at) => (&argv[..at], Some(argv[at + 1..].to_vec())),
        None => (argv, None),
    }
}

fn program_name(exe: &str) -> String {
    Path::new(exe)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "mdc".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn argv(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case(&["mdc"], &[], &[])]
    #[case(&["mdc", "build"], &["build"], &[])]
    #[case(&["mdc", "build", "a", "-x"], &["build"], &["a", "-x"])]
    #[case(&["mdc", "deploy", "staging", "--"], &["deploy", "staging"], &[])]
    #[case(&["mdc", "deploy", "staging", "--", "a", "--", "b"], &["deploy", "staging"], &["a", "--", "b"])]
    #[case(&["mdc", "-v", "build", "--", "-v"], &["build"], &["-v"])]
    #[case(&["mdc", "--", "hello", "there"], &["hello"], &["there"])]
    #[case(&["mdc", "-v", "--", "hello"], &["hello"], &[])]
    #[case(&["mdc", "--"], &[], &[])]
    fn words_split_into_path_and_args(
        #[case] line: &[&str],
        #[case] path: &[&str],
        #[case] args: &[&str],
    ) {
        let config = Config::from_args(&argv(line));
        assert_eq!(config.target.path, argv(path));
        assert_eq!(config.target.args, argv(args));
    }

    #[test]
    fn flags_before_heading_are_parsed() {
        let config = Config::from_args(&argv(&["/usr/bin/tasks", "-am", "--loose", "-f", "x.md", "run"]));
        assert!(config.all);
        assert!(config.markdown);
        assert!(!config.code);
        assert_eq!(config.path_match, PathMatch::Loose);
        assert_eq!(config.file, Some(PathBuf::from("x.md")));
        assert_eq!(config.program, "tasks");
        assert_eq!(config.exe, "/usr/bin/tasks");
    }

    #[test]
    fn program_name_is_the_file_stem() {
        assert_eq!(program_name("./bin/deploy.exe"), "deploy");
        assert_eq!(program_name(""), "mdc");
    }
}
