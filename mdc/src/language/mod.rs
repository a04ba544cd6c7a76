/// One slot in an interpreter argument template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateArg {
    /// Passed through unchanged.
    Literal(&'static str),
    /// Replaced with the language entry's name.
    ProgramName,
    /// Replaced with the code block's full source text.
    Code,
}

use TemplateArg::{Code, Literal, ProgramName};

const SHELL: &[TemplateArg] = &[ProgramName, Literal("-euc"), Code, Literal("--")];
const SH_ALIAS: &[TemplateArg] = &[Literal("sh"), Literal("-euc"), Code, Literal("--")];
const AWK: &[TemplateArg] = &[Literal("awk"), Code];
const NODE: &[TemplateArg] = &[Literal("node"), Literal("-e"), Code];
const PYTHON: &[TemplateArg] = &[Literal("python3"), Literal("-c"), Code];
const RUBY: &[TemplateArg] = &[Literal("ruby"), Literal("-e"), Code];
const PHP: &[TemplateArg] = &[Literal("php"), Literal("-r"), Code];
const CMD: &[TemplateArg] = &[Literal("cmd.exe"), Literal("/c"), Code];
const POWERSHELL: &[TemplateArg] = &[Literal("powershell.exe"), Literal("-c"), Code];

/// How to run code written in one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub name: &'static str,
    pub template: &'static [TemplateArg],
}

impl Language {
    pub const fn new(name: &'static str, template: &'static [TemplateArg]) -> Self {
        Language { name, template }
    }

    /// Build the full argument vector: the instantiated template followed
    /// by `args` verbatim. The first element is the program to run.
    pub fn argv(&self, code: &str, args: &[String]) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.template.len() + args.len());
        for slot in self.template {
            argv.push(match slot {
                Literal(text) => (*text).to_string(),
                ProgramName => self.name.to_string(),
                Code => code.to_string(),
            });
        }
        argv.extend(args.iter().cloned());
        argv
    }
}

/// Static mapping from code-fence language tags to interpreters.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
}

impl LanguageRegistry {
    pub fn new(languages: Vec<Language>) -> Self {
        LanguageRegistry { languages }
    }

    /// Case-insensitive lookup by tag.
    pub fn lookup(&self, tag: &str) -> Option<&Language> {
        self.languages
            .iter()
            .find(|lang| lang.name.eq_ignore_ascii_case(tag))
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.languages.iter().map(|lang| lang.name)
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        LanguageRegistry::new(vec![
            Language::new("sh", SHELL),
            Language::new("bash", SHELL),
            Language::new("zsh", SHELL),
            Language::new("fish", SHELL),
            Language::new("dash", SHELL),
            Language::new("ksh", SHELL),
            Language::new("ash", SHELL),
            Language::new("shell", SH_ALIAS),
            Language::new("awk", AWK),
            Language::new("js", NODE),
            Language::new("javascript", NODE),
            Language::new("py", PYTHON),
            Language::new("python", PYTHON),
            Language::new("rb", RUBY),
            Language::new("ruby", RUBY),
            Language::new("php", PHP),
            Language::new("cmd", CMD),
            Language::new("batch", CMD),
            Language::new("powershell", POWERSHELL),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case("bash", &["bash", "-euc", "echo hi", "--", "a", "b"])]
    #[case("ZSH", &["zsh", "-euc", "echo hi", "--", "a", "b"])]
    #[case("shell", &["sh", "-euc", "echo hi", "--", "a", "b"])]
    #[case("py", &["python3", "-c", "echo hi", "a", "b"])]
    #[case("JavaScript", &["node", "-e", "echo hi", "a", "b"])]
    #[case("awk", &["awk", "echo hi", "a", "b"])]
    #[case("php", &["php", "-r", "echo hi", "a", "b"])]
    #[case("batch", &["cmd.exe", "/c", "echo hi", "a", "b"])]
    #[case("PowerShell", &["powershell.exe", "-c", "echo hi", "a", "b"])]
    fn argv_appends_trailing_arguments(#[case] tag: &str, #[case] expected: &[&str]) {
        let registry = LanguageRegistry::default();
        let lang = registry.lookup(tag).expect("registered");
        assert_eq!(lang.argv("echo hi", &strings(&["a", "b"])), strings(expected));
    }

    #[rstest]
    #[case("rust")]
    #[case("")]
    #[case("python3")]
    fn unknown_tags_are_not_registered(#[case] tag: &str) {
        assert!(!LanguageRegistry::default().is_registered(tag));
    }

    #[test]
    fn default_registry_covers_the_shell_family() {
        let registry = LanguageRegistry::default();
        for name in ["sh", "bash", "zsh", "fish", "dash", "ksh", "ash", "shell"] {
            assert!(registry.is_registered(name), "{} missing", name);
        }
        assert_eq!(registry.names().count(), 19);
    }
}
