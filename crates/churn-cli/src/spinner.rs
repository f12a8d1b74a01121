//! Install spinner.
//!
//! [`SpinnerRunner`] decorates any [`ProcessRunner`] so each install command
//! gets its own spinner, started before the process and finished (or
//! abandoned) after it. The child inherits the terminal, so the spinner is
//! suspended while it runs. Hidden when output is quiet or stderr is not a
//! terminal.

use std::path::Path;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

use churn_core::{application::ProcessRunner, domain::InstallCommand, error::ChurnResult};

pub struct SpinnerRunner {
    inner: Box<dyn ProcessRunner>,
    visible: bool,
}

impl SpinnerRunner {
    pub fn new(inner: Box<dyn ProcessRunner>, visible: bool) -> Self {
        Self { inner, visible }
    }

    fn start(&self, command: &InstallCommand) -> SpinnerGuard {
        let bar = if self.visible {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("Running {command}..."));
        bar.tick();
        SpinnerGuard(bar)
    }

    /// Run `command` with the spinner cleared off the terminal, then leave
    /// the outcome line behind.
    fn run_under(
        &self,
        spinner: &SpinnerGuard,
        command: &InstallCommand,
        cwd: &Path,
    ) -> ChurnResult<()> {
        let result = spinner.0.suspend(|| self.inner.run(command, cwd));
        match &result {
            Ok(()) => spinner.0.finish_with_message(format!("\u{2713} {command}")),
            Err(_) => spinner.0.abandon_with_message(format!("\u{2717} {command} failed")),
        }
        result
    }
}

impl ProcessRunner for SpinnerRunner {
    fn run(&self, command: &InstallCommand, cwd: &Path) -> ChurnResult<()> {
        let spinner = self.start(command);
        debug!(%command, "spinner started");
        self.run_under(&spinner, command, cwd)
    }
}

/// Clears the spinner if the run unwinds before finishing it.
struct SpinnerGuard(ProgressBar);

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        if !self.0.is_finished() {
            self.0.finish_and_clear();
        }
    }
}
