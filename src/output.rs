// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes for reports and progress.

use serde::Serialize;
use std::time::Instant;

use crate::deploy::{DeploymentReport, RollbackResult, ValidationReport};
use crate::types::KindCategory;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    #[default]
    Text,
    /// Minimal output for CI (only final result)
    Quiet,
    /// A single JSON document per report, for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Text {
            println!("{message}");
        }
    }

    /// Print a warning (suppressed in json mode, where the report speaks for itself).
    pub fn warning(&self, message: &str) {
        if self.mode != OutputMode::Json {
            eprintln!("Warning: {message}");
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Text | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "error",
                    message,
                    duration_secs: self.start_time.map(|_| self.elapsed_secs()),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }

    /// Print the final deployment report, with the rollback that followed it if any.
    ///
    /// JSON mode emits one document: the report with an extra `rollback` field.
    pub fn report(&self, report: &DeploymentReport, rollback: Option<&RollbackResult>) {
        match self.mode {
            OutputMode::Text => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!(
                        "Deployment to {} ({}): {} ({:.1}s)",
                        report.workspace, report.mode, report.status, elapsed
                    );
                } else {
                    println!(
                        "Deployment to {} ({}): {}",
                        report.workspace, report.mode, report.status
                    );
                }
                println!(
                    "  deployed: {}, failed: {}, success rate: {}",
                    report.summary.total_deployed,
                    report.summary.total_failed,
                    report.summary.success_rate
                );
                for category in KindCategory::ALL {
                    let counters = report.details.get(category);
                    println!(
                        "  {:<12} {} deployed, {} failed",
                        category.as_str(),
                        counters.deployed,
                        counters.failed
                    );
                }
                if let Some(result) = rollback {
                    print_rollback_text(result);
                }
            }
            OutputMode::Quiet => {
                println!(
                    "{}: {} deployed, {} failed ({})",
                    report.status,
                    report.summary.total_deployed,
                    report.summary.total_failed,
                    report.summary.success_rate
                );
                if let Some(result) = rollback {
                    println!(
                        "{}: {} action(s), {} failed",
                        serde_label(&result.status),
                        result.actions.len(),
                        result.failed_actions()
                    );
                }
            }
            OutputMode::Json => print_json(&ReportDocument { report, rollback }),
        }
    }

    /// Print a validate-only summary.
    pub fn validation(&self, report: &ValidationReport) {
        match self.mode {
            OutputMode::Text => {
                println!(
                    "Validated {} artifact(s) for {} ({}), {} file(s) skipped",
                    report.artifacts.len(),
                    report.workspace,
                    report.environment,
                    report.skipped
                );
                for artifact in &report.artifacts {
                    match &artifact.error {
                        Some(error) => {
                            println!("  ✗ {} {}: {}", artifact.kind, artifact.path, error)
                        }
                        None => println!("  ✓ {} {}", artifact.kind, artifact.path),
                    }
                }
            }
            OutputMode::Quiet => {
                let status = if report.is_valid() { "VALID" } else { "INVALID" };
                println!("{}: {} artifact(s)", status, report.artifacts.len());
            }
            OutputMode::Json => print_json(report),
        }
    }
}

fn print_rollback_text(result: &RollbackResult) {
    println!("Rollback: {}", serde_label(&result.status));
    for action in &result.actions {
        match &action.error {
            Some(error) => println!(
                "  {} {}: {} ({})",
                action.kind,
                action.name,
                serde_label(&action.status),
                error
            ),
            None => println!(
                "  {} {}: {}",
                action.kind,
                action.name,
                serde_label(&action.status)
            ),
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error: failed to serialize output: {e}"),
    }
}

/// The serialized name of a unit enum variant, e.g. `NO_HISTORY`.
fn serde_label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    #[serde(flatten)]
    report: &'a DeploymentReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    rollback: Option<&'a RollbackResult>,
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}
