//! The scaffold command: flags or prompts in, project on disk out.
//!
//! Dispatch sequence:
//! 1. Build a draft from flags and configured defaults
//! 2. Ask the remaining questions when running interactively
//! 3. Resolve the configuration and compute the plan
//! 4. Early-exit on `--dry-run`
//! 5. Refuse (or with `--force` clear) an existing project directory
//! 6. Execute the plan via `ScaffoldService`
//! 7. Print the report or next steps

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use churn_adapters::{LocalFilesystem, SystemProcessRunner};
use churn_core::{
    application::{InstallOutcome, ScaffoldOptions, ScaffoldReport, ScaffoldService},
    domain::{Configuration, ConfigurationDraft, EvmFramework, ScaffoldPlan, generators},
    error::ChurnError,
};

use crate::{
    cli::{Cli, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
    spinner::SpinnerRunner,
};

const DOCS_URL: &str = "https://github.com/Basharkhan7776/Churn";

#[derive(Serialize)]
struct JsonReport<'a> {
    report: &'a ScaffoldReport,
    finished_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct DryRunReport<'a> {
    root: &'a Path,
    dry_run: bool,
    files: Vec<PathBuf>,
    installs: Vec<String>,
}

/// `long_flag_given` is `true` when any `--`-prefixed token was on the
/// command line; such runs never prompt.
#[instrument(skip_all, fields(name = cli.name.as_deref().unwrap_or("<unset>")))]
pub fn execute(
    cli: Cli,
    config: &AppConfig,
    output: &OutputManager,
    long_flag_given: bool,
) -> CliResult<()> {
    let Cli {
        name, run, flags, ..
    } = cli;

    let interactive = !long_flag_given
        && flags.is_empty()
        && !run.yes
        && std::io::stdin().is_terminal()
        && output.format() != OutputFormat::Json;

    let mut draft = flags.to_draft(name);
    config.apply_defaults(&mut draft)?;

    if interactive {
        match prompt(draft)? {
            Some(answered) => draft = answered,
            None => {
                output.warning("Operation cancelled.")?;
                return Ok(());
            }
        }
    }

    let configuration = draft.resolve().map_err(ChurnError::from)?;
    debug!(config = ?configuration, "Configuration resolved");

    let plan = generators::plan(&configuration)?;

    if run.dry_run {
        return dry_run(&plan, output);
    }

    let target = plan.root().to_path_buf();
    let filesystem = LocalFilesystem::new();
    if filesystem.is_non_empty_dir(&target) {
        if !run.force {
            return Err(CliError::ProjectExists { path: target });
        }
        warn!(path = %target.display(), "Removing existing project directory");
        output.warning(&format!("Replacing existing directory {}", target.display()))?;
        std::fs::remove_dir_all(&target)
            .with_cli_context(|| format!("removing {}", target.display()))?;
    }

    let spinner_visible = !output.is_quiet() && std::io::stderr().is_terminal();
    let service = ScaffoldService::new(
        Box::new(filesystem),
        Box::new(SpinnerRunner::new(
            Box::new(SystemProcessRunner::new()),
            spinner_visible,
        )),
    );
    let options = ScaffoldOptions {
        install: !run.skip_install && config.install.enabled,
    };

    output.header(&format!(
        "Creating '{}' ({})...",
        configuration.project_name(),
        configuration.language().display_name()
    ))?;
    let report = service.execute(&plan, &options)?;
    info!(files = report.files_written.len(), "Scaffold finished");

    for install in &report.installs {
        if let InstallOutcome::Failed { reason } = &install.outcome {
            output.warning(&format!("'{}' failed: {reason}", install.command))?;
        }
    }

    if output.format() == OutputFormat::Json {
        output.json(&JsonReport {
            report: &report,
            finished_at: Utc::now(),
        })?;
        return Ok(());
    }

    print_next_steps(&configuration, &report, output)
}

#[cfg(feature = "interactive")]
fn prompt(draft: ConfigurationDraft) -> CliResult<Option<ConfigurationDraft>> {
    crate::interactive::collect(&mut crate::interactive::DialoguerPrompter::new(), draft)
}

#[cfg(not(feature = "interactive"))]
fn prompt(draft: ConfigurationDraft) -> CliResult<Option<ConfigurationDraft>> {
    debug!("Built without prompts, using defaults");
    Ok(Some(draft))
}

fn dry_run(plan: &ScaffoldPlan, output: &OutputManager) -> CliResult<()> {
    output.json(&DryRunReport {
        root: plan.root(),
        dry_run: true,
        files: plan.file_paths(),
        installs: plan.installs().iter().map(ToString::to_string).collect(),
    })?;

    output.info(&format!(
        "Dry run: would create {} with {} files",
        plan.root().display(),
        plan.file_count()
    ))?;
    for path in plan.file_paths() {
        output.print(&format!("  {}", path.display()))?;
    }
    for command in plan.installs() {
        output.info(&format!("Then run: {command}"))?;
    }
    Ok(())
}

/// The command that proves the project works once dependencies are in.
fn first_run_command(config: &Configuration) -> String {
    match config.solidity().map(|s| s.evm_framework()) {
        None => config.package_manager().run_script("dev"),
        Some(EvmFramework::Foundry) => "forge build".to_string(),
        Some(_) => config.package_manager().run_script("compile"),
    }
}

fn print_next_steps(
    config: &Configuration,
    report: &ScaffoldReport,
    output: &OutputManager,
) -> CliResult<()> {
    output.print("")?;
    output.success(&format!(
        "Project '{}' created with {} files!",
        config.project_name(),
        report.files_written.len()
    ))?;
    output.info(&format!("Location: {}", report.root.display()))?;

    output.print("")?;
    output.header("Next steps:")?;
    output.command(&format!("cd {}", config.project_name()))?;
    for install in &report.installs {
        if install.outcome != InstallOutcome::Succeeded {
            output.command(&install.command)?;
        }
    }
    output.command(&first_run_command(config))?;

    if config.language().is_backend() && config.orm().requires_database() {
        output.print("")?;
        output.info("Set DATABASE_URL in .env, then run your migrations")?;
    }

    output.print("")?;
    output.print(&format!("Documentation: {DOCS_URL}"))?;
    Ok(())
}
