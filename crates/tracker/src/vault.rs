//! Vault abstraction: how the engine enumerates and reads documents.

use crate::error::{Result, TrackerError};
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// One enumerated markdown file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    /// Vault-relative path with `/` separators.
    pub path: String,
    /// Modification time, unix milliseconds.
    pub mtime: u64,
}

/// Host file storage, as the engine consumes it.
pub trait Vault {
    /// Every markdown file currently in the vault, with its mtime.
    fn list_markdown_files(&self) -> Result<Vec<FileMeta>>;

    /// Full content of a vault-relative path. Implementations may serve a
    /// cached/unchanged-content fast path.
    fn read(&self, path: &str) -> Result<String>;
}

/// Filesystem vault rooted at a directory. Walks gitignore-aware and skips
/// hidden entries, so state directories like `.gtd-tracker` stay invisible.
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(TrackerError::Other(format!(
                "vault root is not a directory: {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Vault-relative form of an absolute path, `/`-separated; `None` for
    /// paths outside the root.
    #[must_use]
    pub fn relative_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let mut out = relative.to_string_lossy().into_owned();
        if out.contains('\\') {
            out = out.replace('\\', "/");
        }
        Some(out)
    }
}

impl Vault for FsVault {
    fn list_markdown_files(&self) -> Result<Vec<FileMeta>> {
        let mut files = Vec::new();

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true);

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }
                    let path = entry.path();
                    if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
                        continue;
                    }
                    let Some(relative) = self.relative_path(path) else {
                        continue;
                    };
                    let mtime = entry
                        .metadata()
                        .ok()
                        .and_then(|meta| meta.modified().ok())
                        .map(unix_ms)
                        .unwrap_or(0);
                    files.push(FileMeta {
                        path: relative,
                        mtime,
                    });
                }
                Err(err) => log::warn!("failed to read vault entry: {err}"),
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    fn read(&self, path: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.root.join(path))?)
    }
}

pub(crate) fn unix_ms(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// In-memory vault for tests and hosts without a filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryVault {
    files: BTreeMap<String, (u64, String)>,
}

impl MemoryVault {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn add(mut self, path: impl Into<String>, mtime: u64, content: impl Into<String>) -> Self {
        self.set(path, mtime, content);
        self
    }

    pub fn set(&mut self, path: impl Into<String>, mtime: u64, content: impl Into<String>) {
        self.files.insert(path.into(), (mtime, content.into()));
    }

    pub fn remove(&mut self, path: &str) {
        self.files.remove(path);
    }
}

impl Vault for MemoryVault {
    fn list_markdown_files(&self) -> Result<Vec<FileMeta>> {
        Ok(self
            .files
            .iter()
            .filter(|(path, _)| path.ends_with(".md"))
            .map(|(path, (mtime, _))| FileMeta {
                path: path.clone(),
                mtime: *mtime,
            })
            .collect())
    }

    fn read(&self, path: &str) -> Result<String> {
        self.files
            .get(path)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| TrackerError::Other(format!("no such file: {path}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lists_only_markdown_files_with_relative_paths() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("Projects/client")).unwrap();
        fs::write(temp.path().join("Projects/a.md"), "a").unwrap();
        fs::write(temp.path().join("Projects/client/b.md"), "b").unwrap();
        fs::write(temp.path().join("Projects/notes.txt"), "t").unwrap();

        let vault = FsVault::new(temp.path()).unwrap();
        let files = vault.list_markdown_files().unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();

        assert_eq!(paths, vec!["Projects/a.md", "Projects/client/b.md"]);
        assert!(files.iter().all(|f| f.mtime > 0));
    }

    #[test]
    fn hidden_directories_are_skipped() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join(".gtd-tracker")).unwrap();
        fs::write(temp.path().join(".gtd-tracker/readme.md"), "x").unwrap();
        fs::write(temp.path().join("visible.md"), "y").unwrap();

        let vault = FsVault::new(temp.path()).unwrap();
        let files = vault.list_markdown_files().unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["visible.md"]);
    }

    #[test]
    fn reads_relative_paths() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("Projects")).unwrap();
        fs::write(temp.path().join("Projects/a.md"), "content here").unwrap();

        let vault = FsVault::new(temp.path()).unwrap();
        assert_eq!(vault.read("Projects/a.md").unwrap(), "content here");
        assert!(vault.read("Projects/missing.md").is_err());
    }

    #[test]
    fn rejects_missing_root() {
        let temp = tempdir().unwrap();
        assert!(FsVault::new(temp.path().join("nope")).is_err());
    }

    #[test]
    fn memory_vault_round_trip() {
        let vault = MemoryVault::new()
            .add("Projects/a.md", 10, "alpha")
            .add("Projects/b.md", 20, "beta");

        let files = vault.list_markdown_files().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "Projects/a.md");
        assert_eq!(files[0].mtime, 10);
        assert_eq!(vault.read("Projects/b.md").unwrap(), "beta");
        assert!(vault.read("Projects/c.md").is_err());
    }
}
