// ABOUTME: Deploy command implementation.
// ABOUTME: Loads config and source, runs the deployment or validation, prints and saves the report.

use crate::cli::Cli;
use promoter::config::Config;
use promoter::deploy::{DeploymentRun, RunContext, validate_entries};
use promoter::error::{Error, Result};
use promoter::output::Output;
use promoter::publish::{HttpPublisher, Publisher};
use promoter::source::Source;
use promoter::types::WorkspaceName;
use serde::Serialize;
use std::env;
use std::path::Path;

/// Run the deploy command. Returns the process exit code.
pub async fn deploy(cli: Cli, output: &mut Output) -> Result<i32> {
    output.start_timer();

    let workspace = WorkspaceName::new(&cli.workspace)?;
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&env::current_dir()?)?,
    };

    let source = match (cli.bundle, cli.git_repo) {
        (Some(path), _) => Source::Bundle(path),
        (None, Some(path)) => Source::Tree(path),
        (None, None) => return Err(Error::NoSource),
    }
    .resolve()?;

    output.progress(&format!(
        "Reading {} {}",
        source.label(),
        source.path().display()
    ));
    let entries = tokio::task::spawn_blocking(move || source.entries()).await??;

    if cli.validate_only || cli.mode.is_validation() {
        output.progress(&format!(
            "Validating {} file(s) for {} ({})",
            entries.len(),
            workspace,
            workspace.environment()
        ));
        let report = validate_entries(&workspace, entries, &config.parameters);
        output.validation(&report);
        if let Some(path) = &cli.report_file {
            write_json(path, &report)?;
        }
        return Ok(report.exit_code());
    }

    if config.parameters.is_empty() {
        tracing::debug!("no substitution rules configured, pipelines deploy unchanged");
    }

    let publisher = HttpPublisher::from_config(&config.api, config.workspaces.clone())?;
    let workspace_id = publisher.resolve_workspace(&workspace).await?;

    let rollback_enabled = !cli.no_rollback;
    let rollback_on_failure =
        rollback_enabled && (cli.rollback_on_failure || cli.mode.rolls_back_on_failure());

    let context = RunContext::new(workspace, workspace_id, cli.mode);
    output.progress(&format!(
        "Deploying {} file(s) to {} ({}, {} mode)",
        entries.len(),
        context.workspace,
        context.environment,
        context.mode
    ));

    let mut run = DeploymentRun::new(&publisher, &config.parameters, context, rollback_enabled);
    run.deploy_all(entries).await;

    let report = run.report();
    let rollback = if report.status.is_failure() && rollback_on_failure {
        output.progress("Deployment failed, rolling back...");
        Some(run.rollback().await)
    } else {
        None
    };

    output.report(&report, rollback.as_ref());
    for warning in run.diagnostics().warnings() {
        output.warning(&warning.message);
    }
    if let Some(result) = &rollback
        && result.failed_actions() > 0
    {
        output.warning(&format!(
            "{} rollback action(s) failed",
            result.failed_actions()
        ));
    }
    if let Some(path) = &cli.report_file {
        write_json(path, &report)?;
    }

    Ok(report.exit_code())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "report written");
    Ok(())
}
