// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: One deploy command: a source, a target workspace, and run options.

use clap::{ArgGroup, Parser};
use promoter::deploy::DeployMode;
use promoter::output::OutputMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "promoter")]
#[command(about = "Promote notebooks, pipelines, and dataflows into a workspace")]
#[command(version)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["bundle", "git_repo"]),
))]
pub struct Cli {
    /// Deploy from a tar or tar.gz bundle
    #[arg(long, value_name = "PATH")]
    pub bundle: Option<PathBuf>,

    /// Deploy from a checked-out repository directory
    #[arg(long, value_name = "PATH")]
    pub git_repo: Option<PathBuf>,

    /// Target workspace display name; selects the environment
    #[arg(short, long)]
    pub workspace: String,

    /// Deployment mode
    #[arg(long, value_enum, default_value_t = DeployMode::Standard)]
    pub mode: DeployMode,

    /// Classify and prepare artifacts without publishing anything
    #[arg(long)]
    pub validate_only: bool,

    /// Configuration file (defaults to promoter.yml in the current directory)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputMode,

    /// Also write the JSON report to this file
    #[arg(long, value_name = "PATH")]
    pub report_file: Option<PathBuf>,

    /// Disable rollback for this run
    #[arg(long, conflicts_with = "rollback_on_failure")]
    pub no_rollback: bool,

    /// Roll back every dispatch when the run ends FAILED
    #[arg(long)]
    pub rollback_on_failure: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
