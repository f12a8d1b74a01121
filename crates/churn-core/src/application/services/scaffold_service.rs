//! Scaffold Service - the orchestrator.
//!
//! Carries a [`ScaffoldPlan`] out on disk:
//! 1. `CreateRoot`: create the target directory
//! 2. `EmitCoreFiles`: mandatory files (or the whole contract project)
//! 3. `EmitConditionalBundles`: one bundle per active optional concern
//! 4. `InvokeInstall`: package manager or `forge` commands, never fatal
//!
//! Stages 1 to 3 are fatal. A failure there removes the partial project and
//! surfaces [`ApplicationError::ScaffoldFailed`], which names the stage that
//! failed. A returned [`ScaffoldReport`] always ends at `Completed`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ProcessRunner},
    },
    domain::{
        Bundle, Configuration, FsEntry, InstallCommand, PlanKind, ScaffoldPlan, generators,
    },
    error::{ChurnError, ChurnResult},
};

/// Orchestrator states. `Completed` is terminal; failures leave through
/// [`ApplicationError::ScaffoldFailed`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaffoldStage {
    CreateRoot,
    EmitCoreFiles,
    EmitConditionalBundles,
    InvokeInstall,
    Completed,
}

impl ScaffoldStage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateRoot => "create-root",
            Self::EmitCoreFiles => "emit-core-files",
            Self::EmitConditionalBundles => "emit-conditional-bundles",
            Self::InvokeInstall => "invoke-install",
            Self::Completed => "completed",
        }
    }

    /// User-facing prefix for a fatal failure in this stage.
    pub const fn failure_message(&self) -> &'static str {
        match self {
            Self::CreateRoot => "Failed to create project directory",
            _ => "Failed to generate project files",
        }
    }
}

impl fmt::Display for ScaffoldStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaffoldOptions {
    /// Run the install commands. When off every command is reported skipped.
    pub install: bool,
}

impl Default for ScaffoldOptions {
    fn default() -> Self {
        Self { install: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InstallOutcome {
    Succeeded,
    Failed { reason: String },
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub command: String,
    #[serde(flatten)]
    pub outcome: InstallOutcome,
}

/// Result of a completed scaffold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldReport {
    pub root: PathBuf,
    pub kind: PlanKind,
    /// Relative paths, in write order.
    pub files_written: Vec<PathBuf>,
    pub installs: Vec<InstallReport>,
    pub stage: ScaffoldStage,
}

impl ScaffoldReport {
    /// `true` when at least one install command ran and failed.
    pub fn install_failed(&self) -> bool {
        self.installs
            .iter()
            .any(|i| matches!(i.outcome, InstallOutcome::Failed { .. }))
    }

    /// `true` when the user still has to install dependencies by hand.
    pub fn needs_manual_install(&self) -> bool {
        self.installs
            .iter()
            .any(|i| !matches!(i.outcome, InstallOutcome::Succeeded))
    }
}

pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    runner: Box<dyn ProcessRunner>,
}

impl ScaffoldService {
    pub fn new(filesystem: Box<dyn Filesystem>, runner: Box<dyn ProcessRunner>) -> Self {
        Self { filesystem, runner }
    }

    /// Plan and scaffold a project for `config`.
    #[instrument(
        skip_all,
        fields(
            project = %config.project_name(),
            language = %config.language(),
            install = options.install
        )
    )]
    pub fn scaffold(
        &self,
        config: &Configuration,
        options: &ScaffoldOptions,
    ) -> ChurnResult<ScaffoldReport> {
        let plan = generators::plan(config)?;
        self.execute(&plan, options)
    }

    /// Carry out an already computed plan.
    #[instrument(skip_all, fields(root = %plan.root().display(), kind = ?plan.kind()))]
    pub fn execute(
        &self,
        plan: &ScaffoldPlan,
        options: &ScaffoldOptions,
    ) -> ChurnResult<ScaffoldReport> {
        let root = plan.root();
        let root_existed = self.filesystem.exists(root);

        debug!(stage = %ScaffoldStage::CreateRoot, "Entering stage");
        self.filesystem
            .create_dir_all(root)
            .map_err(|e| fatal(ScaffoldStage::CreateRoot, root, &e))?;

        let mut files_written = Vec::with_capacity(plan.file_count());
        if let Err(e) = self.emit_all(plan, &mut files_written) {
            warn!(error = %e, "Emission failed, rolling back");
            if !root_existed {
                self.rollback(root);
            }
            return Err(e);
        }
        info!(files = files_written.len(), "Project files written");

        debug!(stage = %ScaffoldStage::InvokeInstall, "Entering stage");
        let installs = plan
            .installs()
            .iter()
            .map(|command| {
                let outcome = if options.install {
                    self.install(command, root)
                } else {
                    InstallOutcome::Skipped
                };
                InstallReport {
                    command: command.to_string(),
                    outcome,
                }
            })
            .collect();

        info!(stage = %ScaffoldStage::Completed, "Scaffold completed");
        Ok(ScaffoldReport {
            root: root.to_path_buf(),
            kind: plan.kind(),
            files_written,
            installs,
            stage: ScaffoldStage::Completed,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn emit_all(&self, plan: &ScaffoldPlan, written: &mut Vec<PathBuf>) -> ChurnResult<()> {
        debug!(stage = %ScaffoldStage::EmitCoreFiles, "Entering stage");
        self.emit_bundle(plan.root(), plan.core(), written)
            .map_err(|e| fatal(ScaffoldStage::EmitCoreFiles, plan.root(), &e))?;

        debug!(stage = %ScaffoldStage::EmitConditionalBundles, bundles = plan.bundles().len(), "Entering stage");
        for bundle in plan.bundles() {
            self.emit_bundle(plan.root(), bundle, written)
                .map_err(|e| fatal(ScaffoldStage::EmitConditionalBundles, plan.root(), &e))?;
        }
        Ok(())
    }

    fn emit_bundle(
        &self,
        root: &Path,
        bundle: &Bundle,
        written: &mut Vec<PathBuf>,
    ) -> ChurnResult<()> {
        debug!(bundle = bundle.name(), "Emitting bundle");
        for entry in bundle.entries() {
            match entry {
                FsEntry::Directory(dir) => {
                    self.filesystem.create_dir_all(&root.join(&dir.path))?;
                }
                FsEntry::File(file) => {
                    let path = root.join(&file.path);
                    if let Some(parent) = path.parent() {
                        self.filesystem.create_dir_all(parent)?;
                    }
                    self.filesystem.write_file(&path, &file.content)?;
                    written.push(file.path.clone());
                }
            }
        }
        Ok(())
    }

    fn install(&self, command: &InstallCommand, root: &Path) -> InstallOutcome {
        info!(command = %command, "Running install command");
        match self.runner.run(command, root) {
            Ok(()) => InstallOutcome::Succeeded,
            Err(e) => {
                warn!(command = %command, error = %e, "Install failed, continuing");
                InstallOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Best-effort removal of a partially written project.
    fn rollback(&self, root: &Path) {
        match self.filesystem.remove_dir_all(root) {
            Ok(()) => info!(path = %root.display(), "Rollback successful"),
            Err(e) => warn!(error = %e, path = %root.display(), "Rollback failed"),
        }
    }
}

fn fatal(stage: ScaffoldStage, root: &Path, cause: &ChurnError) -> ChurnError {
    ApplicationError::ScaffoldFailed {
        stage,
        path: root.to_path_buf(),
        reason: cause.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, MockProcessRunner};
    use crate::domain::generators::test_support::{full_stack, minimal_js, resolve};
    use std::sync::{Arc, Mutex};

    fn fs_error(path: &Path) -> ChurnError {
        ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: "permission denied".into(),
        }
        .into()
    }

    fn permissive_fs(written: Arc<Mutex<Vec<PathBuf>>>) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(move |path, _| {
            written.lock().unwrap().push(path.to_path_buf());
            Ok(())
        });
        fs
    }

    #[test]
    fn minimal_scaffold_writes_core_and_installs() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let fs = permissive_fs(Arc::clone(&written));

        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|cmd, cwd| cmd.to_string() == "npm install" && cwd == Path::new("./mini"))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = ScaffoldService::new(Box::new(fs), Box::new(runner));
        let report = service
            .scaffold(&resolve(minimal_js()), &ScaffoldOptions::default())
            .unwrap();

        assert_eq!(report.stage, ScaffoldStage::Completed);
        assert_eq!(report.files_written.len(), 5);
        assert_eq!(written.lock().unwrap().len(), 5);
        assert_eq!(report.installs[0].outcome, InstallOutcome::Succeeded);
        assert!(!report.needs_manual_install());
    }

    #[test]
    fn root_creation_failure_aborts_before_any_write() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all()
            .withf(|p| p == Path::new("./mini"))
            .times(1)
            .returning(|p| Err(fs_error(p)));
        fs.expect_write_file().never();
        fs.expect_remove_dir_all().never();

        let mut runner = MockProcessRunner::new();
        runner.expect_run().never();

        let service = ScaffoldService::new(Box::new(fs), Box::new(runner));
        let err = service
            .scaffold(&resolve(minimal_js()), &ScaffoldOptions::default())
            .unwrap_err();

        assert!(matches!(
            err,
            ChurnError::Application(ApplicationError::ScaffoldFailed {
                stage: ScaffoldStage::CreateRoot,
                ..
            })
        ));
        assert!(err.to_string().starts_with("Failed to create project directory"));
    }

    #[test]
    fn core_write_failure_rolls_back() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|p, _| Err(fs_error(p)));
        fs.expect_remove_dir_all()
            .withf(|p| p == Path::new("./mini"))
            .times(1)
            .returning(|_| Ok(()));

        let mut runner = MockProcessRunner::new();
        runner.expect_run().never();

        let service = ScaffoldService::new(Box::new(fs), Box::new(runner));
        let err = service
            .scaffold(&resolve(minimal_js()), &ScaffoldOptions::default())
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to generate project files"));
    }

    #[test]
    fn optional_bundle_failure_names_its_stage() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|p, _| {
            if p.ends_with("Dockerfile") {
                Err(fs_error(p))
            } else {
                Ok(())
            }
        });
        fs.expect_remove_dir_all()
            .withf(|p| p == Path::new("./full-app"))
            .times(1)
            .returning(|_| Ok(()));

        let mut runner = MockProcessRunner::new();
        runner.expect_run().never();

        let service = ScaffoldService::new(Box::new(fs), Box::new(runner));
        let err = service
            .scaffold(&resolve(full_stack()), &ScaffoldOptions::default())
            .unwrap_err();

        assert!(matches!(
            err,
            ChurnError::Application(ApplicationError::ScaffoldFailed {
                stage: ScaffoldStage::EmitConditionalBundles,
                ..
            })
        ));
        assert_eq!(
            ScaffoldStage::EmitConditionalBundles.to_string(),
            "emit-conditional-bundles"
        );
    }

    #[test]
    fn existing_root_is_never_removed() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|p, _| Err(fs_error(p)));
        fs.expect_remove_dir_all().never();

        let service = ScaffoldService::new(Box::new(fs), Box::new(MockProcessRunner::new()));
        assert!(
            service
                .scaffold(&resolve(minimal_js()), &ScaffoldOptions::default())
                .is_err()
        );
    }

    #[test]
    fn install_failure_is_not_fatal() {
        let fs = permissive_fs(Arc::new(Mutex::new(Vec::new())));
        let mut runner = MockProcessRunner::new();
        runner.expect_run().returning(|cmd, _| {
            Err(ApplicationError::ProcessFailed {
                command: cmd.to_string(),
                reason: "exit status 1".into(),
            }
            .into())
        });

        let service = ScaffoldService::new(Box::new(fs), Box::new(runner));
        let report = service
            .scaffold(&resolve(full_stack()), &ScaffoldOptions::default())
            .unwrap();

        assert_eq!(report.stage, ScaffoldStage::Completed);
        assert!(report.install_failed());
        assert!(report.needs_manual_install());
    }

    #[test]
    fn disabled_install_is_skipped() {
        let fs = permissive_fs(Arc::new(Mutex::new(Vec::new())));
        let mut runner = MockProcessRunner::new();
        runner.expect_run().never();

        let service = ScaffoldService::new(Box::new(fs), Box::new(runner));
        let report = service
            .scaffold(&resolve(minimal_js()), &ScaffoldOptions { install: false })
            .unwrap();
        assert_eq!(report.installs[0].outcome, InstallOutcome::Skipped);
        assert!(!report.install_failed());
    }

    #[test]
    fn report_serializes_install_status() {
        let report = InstallReport {
            command: "bun install".into(),
            outcome: InstallOutcome::Failed {
                reason: "boom".into(),
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "boom");
        assert_eq!(json["command"], "bun install");
    }
}
