//! Recursive discovery of candidate log files.

use crate::error::Result;
use crate::file_handler::validation::validate_root_dir;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// The set of files under a root directory whose names end with an extension.
///
/// Paths are collected in file-name order at every directory level, so the order is
/// stable for a given tree. Hidden entries (names starting with `.`) below the root are
/// skipped, the way a `**/*.ext` glob skips them. Symlinked files are kept; symlinked
/// directories are not descended into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileSet {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl LogFileSet {
    /// Walk `root` recursively and collect every regular file ending with `extension`
    ///
    /// # Errors
    /// * `RootNotFound` / `NotADirectory` when the root cannot be scanned
    ///
    /// An empty match set is not an error. Entries that cannot be read during the walk
    /// (permission denied, vanished directories) are logged and skipped.
    pub fn discover(root: &Path, extension: &str) -> Result<Self> {
        validate_root_dir(root)?;

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if is_log_file(&entry) && has_extension(&entry, extension) {
                        files.push(entry.into_path());
                    }
                }
                Err(err) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), err);
                }
            }
        }

        debug!(
            "Discovered {} '{}' files under {}",
            files.len(),
            extension,
            root.display()
        );

        Ok(Self {
            root: root.to_path_buf(),
            files,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.files
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Regular files, and symlinks resolving to one
fn is_log_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

fn has_extension(entry: &DirEntry, extension: &str) -> bool {
    entry.file_name().to_string_lossy().ends_with(extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogscopeError;
    use tempfile::TempDir;

    fn touch(dir: &Path, relative: &str) -> PathBuf {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, "content\n").expect("write file");
        path
    }

    #[test]
    fn test_discover_recursive_with_extension_filter() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let a = touch(root, "a.log");
        let nested = touch(root, "server1/2024/b.log");
        touch(root, "notes.txt");
        touch(root, "server1/c.log.bak");

        let set = LogFileSet::discover(root, ".log").unwrap();
        assert_eq!(set.files(), &[a, nested]);
        assert_eq!(set.root(), root);
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_keeps_symlinked_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let target = touch(root, "archive/real.txt");
        let dangling = root.join("gone.log");
        std::os::unix::fs::symlink(&target, root.join("linked.log")).unwrap();
        std::os::unix::fs::symlink(root.join("missing.txt"), &dangling).unwrap();

        let set = LogFileSet::discover(root, ".log").unwrap();
        assert_eq!(set.files(), &[root.join("linked.log")]);
    }

    #[test]
    fn test_discover_order_is_stable() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        touch(root, "z.log");
        touch(root, "m/x.log");
        touch(root, "b.log");

        let first = LogFileSet::discover(root, ".log").unwrap();
        let second = LogFileSet::discover(root, ".log").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_discover_skips_hidden_entries() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        touch(root, ".archive/old.log");
        touch(root, ".hidden.log");
        let visible = touch(root, "live.log");

        let set = LogFileSet::discover(root, ".log").unwrap();
        assert_eq!(set.into_paths(), vec![visible]);
    }

    #[test]
    fn test_discover_empty_match_is_not_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        touch(temp_dir.path(), "readme.md");

        let set = LogFileSet::discover(temp_dir.path(), ".log").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_discover_missing_root() {
        let result = LogFileSet::discover(Path::new("/no/such/log/root"), ".log");
        assert!(matches!(result, Err(LogscopeError::RootNotFound { .. })));
    }
}
