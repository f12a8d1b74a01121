//! Runs install commands with `std::process::Command`.

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use churn_core::{
    application::{ApplicationError, ports::ProcessRunner},
    domain::InstallCommand,
    error::ChurnResult,
};
use tracing::{debug, instrument};

/// Spawns the real program with inherited stdio and blocks until it exits.
///
/// On Windows package managers are `.cmd` shims, so the command goes
/// through `cmd /C`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(install: &InstallCommand) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&install.program).args(&install.args);
            cmd
        } else {
            let mut cmd = Command::new(&install.program);
            cmd.args(&install.args);
            cmd
        }
    }
}

impl ProcessRunner for SystemProcessRunner {
    #[instrument(skip_all, fields(command = %command, cwd = %cwd.display()))]
    fn run(&self, command: &InstallCommand, cwd: &Path) -> ChurnResult<()> {
        let status = Self::command(command)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| ApplicationError::ProcessFailed {
                command: command.to_string(),
                reason: format!("could not start `{}`: {e}", command.program),
            })?;

        debug!(%status, "Command exited");
        check_status(command, status)
    }
}

fn check_status(command: &InstallCommand, status: ExitStatus) -> ChurnResult<()> {
    if status.success() {
        return Ok(());
    }
    let reason = match status.code() {
        Some(code) => format!("exited with status {code}"),
        None => "terminated by a signal".to_string(),
    };
    Err(ApplicationError::ProcessFailed {
        command: command.to_string(),
        reason,
    }
    .into())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn zero_exit_is_success() {
        let tmp = TempDir::new().unwrap();
        let cmd = InstallCommand::new("true", Vec::<String>::new());
        assert!(SystemProcessRunner.run(&cmd, tmp.path()).is_ok());
    }

    #[test]
    fn non_zero_exit_is_a_process_failure() {
        let tmp = TempDir::new().unwrap();
        let cmd = InstallCommand::new("sh", ["-c", "exit 3"]);
        let err = SystemProcessRunner.run(&cmd, tmp.path()).unwrap_err();
        assert!(err.to_string().contains("exited with status 3"));
    }

    #[test]
    fn missing_program_is_a_process_failure() {
        let tmp = TempDir::new().unwrap();
        let cmd = InstallCommand::new("churn-no-such-program", ["install"]);
        let err = SystemProcessRunner.run(&cmd, tmp.path()).unwrap_err();
        assert!(err.to_string().contains("could not start"));
    }

    #[test]
    fn runs_inside_the_working_directory() {
        let tmp = TempDir::new().unwrap();
        let cmd = InstallCommand::new("sh", ["-c", "touch marker"]);
        SystemProcessRunner.run(&cmd, tmp.path()).unwrap();
        assert!(tmp.path().join("marker").exists());
    }
}
