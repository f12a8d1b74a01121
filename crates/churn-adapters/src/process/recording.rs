//! Process runner that records commands instead of running them.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use churn_core::{
    application::{ApplicationError, ports::ProcessRunner},
    domain::InstallCommand,
    error::ChurnResult,
};
use tracing::debug;

/// Records every command with its working directory.
///
/// Commands matching a `fail_when` needle (or all, for `failing()`) answer with
/// [`ApplicationError::ProcessFailed`]; everything else succeeds.
#[derive(Debug, Clone, Default)]
pub struct RecordingProcessRunner {
    inner: Arc<Mutex<Recorded>>,
}

#[derive(Debug, Default)]
struct Recorded {
    calls: Vec<(InstallCommand, PathBuf)>,
    failing: Vec<String>,
    fail_all: bool,
}

impl RecordingProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A runner on which every command fails.
    pub fn failing() -> Self {
        let runner = Self::default();
        if let Ok(mut inner) = runner.inner.lock() {
            inner.fail_all = true;
        }
        runner
    }

    /// Fail commands whose rendered form contains `needle`.
    pub fn fail_when(self, needle: impl Into<String>) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failing.push(needle.into());
        }
        self
    }

    pub fn calls(&self) -> Vec<(InstallCommand, PathBuf)> {
        self.inner
            .lock()
            .map(|inner| inner.calls.clone())
            .unwrap_or_default()
    }

    /// Recorded commands rendered as command lines.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(|(c, _)| c.to_string()).collect()
    }
}

impl ProcessRunner for RecordingProcessRunner {
    fn run(&self, command: &InstallCommand, cwd: &Path) -> ChurnResult<()> {
        let mut inner = self.inner.lock().map_err(|_| ApplicationError::LockPoisoned {
            what: "recording process runner",
        })?;
        inner.calls.push((command.clone(), cwd.to_path_buf()));

        let line = command.to_string();
        debug!(command = %line, "Recorded command");
        if inner.fail_all || inner.failing.iter().any(|n| line.contains(n.as_str())) {
            return Err(ApplicationError::ProcessFailed {
                command: line,
                reason: "exited with status 1".into(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_fails_selectively() {
        let runner = RecordingProcessRunner::new().fail_when("upgradeable");
        let ok = InstallCommand::new("forge", ["install", "foundry-rs/forge-std"]);
        let bad = InstallCommand::new(
            "forge",
            ["install", "OpenZeppelin/openzeppelin-contracts-upgradeable"],
        );

        assert!(runner.run(&ok, Path::new("./app")).is_ok());
        assert!(runner.run(&bad, Path::new("./app")).is_err());
        assert_eq!(runner.calls().len(), 2);
        assert_eq!(runner.calls()[0].1, PathBuf::from("./app"));
    }
}
