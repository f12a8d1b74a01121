use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::error::DomainError;

/// What a scaffold plan produces. Decides which orchestrator branch runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Backend,
    Contract,
}

/// An external command run inside the generated project after emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl InstallCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// A named, all-or-nothing group of generated entries.
///
/// Paths are relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    name: &'static str,
    entries: Vec<FsEntry>,
}

impl Bundle {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.entries.push(FsEntry::File(FileToWrite {
            path: path.into(),
            content: content.into(),
        }));
    }

    pub fn add_directory(&mut self, path: impl Into<PathBuf>) {
        self.entries.push(FsEntry::Directory(DirectoryToCreate { path: path.into() }));
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.add_file(path, content);
        self
    }

    pub fn with_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_directory(path);
        self
    }

    pub fn entries(&self) -> &[FsEntry] {
        &self.entries
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::File(f) => Some(f),
            _ => None,
        })
    }

    pub fn directories(&self) -> impl Iterator<Item = &DirectoryToCreate> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::Directory(d) => Some(d),
            _ => None,
        })
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<&FileToWrite> {
        let path = path.as_ref();
        self.files().find(|f| f.path == path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEntry {
    File(FileToWrite),
    Directory(DirectoryToCreate),
}

impl FsEntry {
    pub fn path(&self) -> &Path {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileToWrite {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryToCreate {
    pub path: PathBuf,
}

/// Everything a scaffold will write and run, computed without I/O.
///
/// The core bundle holds the mandatory files; its failure is fatal. The
/// remaining bundles are the optional concerns in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldPlan {
    root: PathBuf,
    kind: PlanKind,
    core: Bundle,
    bundles: Vec<Bundle>,
    installs: Vec<InstallCommand>,
}

impl ScaffoldPlan {
    pub fn new(root: impl Into<PathBuf>, kind: PlanKind, core: Bundle) -> Self {
        Self {
            root: root.into(),
            kind,
            core,
            bundles: Vec::new(),
            installs: Vec::new(),
        }
    }

    /// Move the plan under another root directory. Relative entry paths
    /// are unaffected.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn push_bundle(&mut self, bundle: Bundle) {
        if !bundle.is_empty() {
            self.bundles.push(bundle);
        }
    }

    pub fn push_install(&mut self, command: InstallCommand) {
        self.installs.push(command);
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind(&self) -> PlanKind {
        self.kind
    }

    pub fn core(&self) -> &Bundle {
        &self.core
    }

    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    pub fn bundle(&self, name: &str) -> Option<&Bundle> {
        self.bundles.iter().find(|b| b.name == name)
    }

    pub fn installs(&self) -> &[InstallCommand] {
        &self.installs
    }

    /// All files, core first, in emission order.
    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        std::iter::once(&self.core)
            .chain(self.bundles.iter())
            .flat_map(Bundle::files)
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<&FileToWrite> {
        let path = path.as_ref();
        self.files().find(|f| f.path == path)
    }

    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.files().map(|f| f.path.clone()).collect()
    }

    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    /// Reject empty plans, absolute paths and files written twice.
    ///
    /// Directories may be declared by several bundles.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.core.is_empty() {
            return Err(DomainError::EmptyPlan);
        }

        let mut seen = HashSet::new();
        for entry in std::iter::once(&self.core)
            .chain(self.bundles.iter())
            .flat_map(|b| b.entries.iter())
        {
            let path = entry.path();
            if path.is_absolute() {
                return Err(DomainError::AbsolutePathNotAllowed {
                    path: path.display().to_string(),
                });
            }

            if let FsEntry::File(file) = entry {
                let path_str = file.path.display().to_string();
                if !seen.insert(path_str.clone()) {
                    return Err(DomainError::DuplicatePath { path: path_str });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core() -> Bundle {
        Bundle::new("core").with_file("package.json", "{}")
    }

    #[test]
    fn empty_bundles_are_not_recorded() {
        let mut plan = ScaffoldPlan::new("./app", PlanKind::Backend, core());
        plan.push_bundle(Bundle::new("docker"));
        assert!(plan.bundles().is_empty());
    }

    #[test]
    fn duplicate_files_across_bundles_are_rejected() {
        let mut plan = ScaffoldPlan::new("./app", PlanKind::Backend, core());
        plan.push_bundle(Bundle::new("linting").with_file("package.json", "{}"));
        assert_eq!(
            plan.validate(),
            Err(DomainError::DuplicatePath {
                path: "package.json".into()
            })
        );
    }

    #[test]
    fn shared_directories_are_allowed() {
        let mut plan = ScaffoldPlan::new(
            "./app",
            PlanKind::Backend,
            core().with_directory("src"),
        );
        plan.push_bundle(
            Bundle::new("orm")
                .with_directory("src")
                .with_file("src/db.ts", ""),
        );
        assert!(plan.validate().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn absolute_paths_are_rejected() {
        let plan = ScaffoldPlan::new(
            "./app",
            PlanKind::Backend,
            Bundle::new("core").with_file("/etc/passwd", ""),
        );
        assert!(matches!(
            plan.validate(),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
    }

    #[test]
    fn empty_core_is_rejected() {
        let plan = ScaffoldPlan::new("./app", PlanKind::Backend, Bundle::new("core"));
        assert_eq!(plan.validate(), Err(DomainError::EmptyPlan));
    }

    #[test]
    fn install_command_display() {
        let cmd = InstallCommand::new("forge", ["install", "foundry-rs/forge-std"]);
        assert_eq!(cmd.to_string(), "forge install foundry-rs/forge-std");
    }
}
