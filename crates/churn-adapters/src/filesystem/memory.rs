//! In-memory filesystem adapter for tests.
//!
//! Records every operation in order and can be told to fail on a given
//! path, which is how permission errors are simulated.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use churn_core::{
    application::{ApplicationError, ports::Filesystem},
    error::ChurnResult,
};

/// One call made against a [`MemoryFilesystem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOperation {
    CreateDir(PathBuf),
    WriteFile(PathBuf),
    RemoveDir(PathBuf),
}

/// In-memory filesystem. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    operations: Vec<FsOperation>,
    failing: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every create or write on exactly `path` fail with a permission error.
    pub fn fail_on(&self, path: impl Into<PathBuf>) -> &Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failing.insert(path.into());
        }
        self
    }

    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.lock().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// All files, sorted by path.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .lock()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Files below `root`, relative to it.
    pub fn files_under(&self, root: impl AsRef<Path>) -> Vec<PathBuf> {
        let root = root.as_ref();
        self.list_files()
            .into_iter()
            .filter_map(|p| p.strip_prefix(root).ok().map(Path::to_path_buf))
            .collect()
    }

    /// Path and content of every file, sorted by path.
    pub fn snapshot(&self) -> Vec<(PathBuf, String)> {
        self.inner
            .lock()
            .map(|inner| inner.files.clone().into_iter().collect())
            .unwrap_or_default()
    }

    pub fn operations(&self) -> Vec<FsOperation> {
        self.inner
            .lock()
            .map(|inner| inner.operations.clone())
            .unwrap_or_default()
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.directories.contains(path.as_ref()))
            .unwrap_or(false)
    }

    fn lock(&self) -> ChurnResult<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| {
            ApplicationError::LockPoisoned {
                what: "memory filesystem",
            }
            .into()
        })
    }
}

fn denied(path: &Path) -> churn_core::error::ChurnError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "Permission denied (simulated)".into(),
    }
    .into()
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> ChurnResult<()> {
        let mut inner = self.lock()?;
        inner.operations.push(FsOperation::CreateDir(path.to_path_buf()));
        if inner.failing.contains(path) {
            return Err(denied(path));
        }

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> ChurnResult<()> {
        let mut inner = self.lock()?;
        inner.operations.push(FsOperation::WriteFile(path.to_path_buf()));
        if inner.failing.contains(path) {
            return Err(denied(path));
        }

        let orphan = path
            .parent()
            .is_some_and(|p| !p.as_os_str().is_empty() && !inner.directories.contains(p));
        if orphan {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Parent directory does not exist".into(),
            }
            .into());
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_dir_all(&self, path: &Path) -> ChurnResult<()> {
        let mut inner = self.lock()?;
        inner.operations.push(FsOperation::RemoveDir(path.to_path_buf()));
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_require_a_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("app/a.txt"), "a").is_err());

        fs.create_dir_all(Path::new("app")).unwrap();
        fs.write_file(Path::new("app/a.txt"), "a").unwrap();
        assert_eq!(fs.read_file("app/a.txt").as_deref(), Some("a"));
    }

    #[test]
    fn injected_failures_are_recorded() {
        let fs = MemoryFilesystem::new();
        fs.fail_on("locked");

        let err = fs.create_dir_all(Path::new("locked")).unwrap_err();
        assert!(err.to_string().contains("Permission denied"));
        assert!(!fs.exists(Path::new("locked")));
        assert_eq!(
            fs.operations(),
            vec![FsOperation::CreateDir(PathBuf::from("locked"))]
        );
    }

    #[test]
    fn remove_dir_all_drops_the_subtree() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("app/src")).unwrap();
        fs.write_file(Path::new("app/src/index.ts"), "").unwrap();
        fs.create_dir_all(Path::new("other")).unwrap();

        fs.remove_dir_all(Path::new("app")).unwrap();
        assert!(fs.list_files().is_empty());
        assert!(!fs.exists(Path::new("app/src")));
        assert!(fs.is_dir("other"));
    }
}
