//! Driven ports, implemented in `churn-adapters`.
//!
//! - `Filesystem`: directory and file creation, rollback removal
//! - `ProcessRunner`: external install commands

use std::path::Path;

use crate::domain::InstallCommand;
use crate::error::ChurnResult;

/// Port for filesystem operations.
///
/// Implemented by `LocalFilesystem` (production) and `MemoryFilesystem`
/// (tests, with failure injection).
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all missing parents.
    fn create_dir_all(&self, path: &Path) -> ChurnResult<()>;

    /// Write a file, replacing any previous content. The parent must exist.
    fn write_file(&self, path: &Path, content: &str) -> ChurnResult<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and everything below it.
    fn remove_dir_all(&self, path: &Path) -> ChurnResult<()>;
}

/// Port for external commands (package managers, `forge`).
///
/// A returned error is a failed command; the orchestrator decides that
/// this is never fatal.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessRunner: Send + Sync {
    /// Run `command` with `cwd` as working directory and wait for it.
    fn run(&self, command: &InstallCommand, cwd: &Path) -> ChurnResult<()>;
}
