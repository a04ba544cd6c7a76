use std::path::{Path, PathBuf};

use log::debug;

/// File names tried in each directory, in order.
fn candidates(program: &str) -> [String; 3] {
    [
        format!("{}.md", program),
        format!(".{}.md", program),
        "README.md".to_string(),
    ]
}

/// Search `start` and then each parent directory for the command
/// document, stopping at the filesystem root.
pub fn find_document(program: &str, start: &Path) -> Option<PathBuf> {
    let names = candidates(program);
    for dir in start.ancestors() {
        for name in &names {
            let path = dir.join(name);
            if path.is_file() {
                debug!("found document {}", path.display());
                return Some(path);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, "# x\n").expect("write");
    }

    #[test]
    fn prefers_program_file_over_hidden_and_readme() {
        let dir = TempDir::new().expect("tempdir");
        touch(&dir.path().join("README.md"));
        touch(&dir.path().join(".tasks.md"));
        assert_eq!(
            find_document("tasks", dir.path()),
            Some(dir.path().join(".tasks.md"))
        );
        touch(&dir.path().join("tasks.md"));
        assert_eq!(
            find_document("tasks", dir.path()),
            Some(dir.path().join("tasks.md"))
        );
    }

    #[test]
    fn walks_up_to_parent_directories() {
        let dir = TempDir::new().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).expect("mkdir");
        touch(&dir.path().join("tasks.md"));
        assert_eq!(
            find_document("tasks", &nested),
            Some(dir.path().join("tasks.md"))
        );
    }

    #[test]
    fn nearer_readme_wins_over_farther_program_file() {
        let dir = TempDir::new().expect("tempdir");
        let nested = dir.path().join("sub");
        fs::create_dir_all(&nested).expect("mkdir");
        touch(&dir.path().join("tasks.md"));
        touch(&nested.join("README.md"));
        assert_eq!(
            find_document("tasks", &nested),
            Some(nested.join("README.md"))
        );
    }

    #[test]
    fn directories_are_not_documents() {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir(dir.path().join("tasks.md")).expect("mkdir");
        touch(&dir.path().join("README.md"));
        assert_eq!(
            find_document("tasks", dir.path()),
            Some(dir.path().join("README.md"))
        );
    }
}
