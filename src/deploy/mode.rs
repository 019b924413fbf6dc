// ABOUTME: Deployment mode selected on the command line.
// ABOUTME: Standard deploys, promote also reverses a failed run, validation only checks.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeployMode {
    #[default]
    Standard,
    /// Environment promotion; rolls back automatically when the run fails.
    Promote,
    /// Classify and prepare artifacts without publishing anything.
    Validation,
}

impl DeployMode {
    pub fn is_validation(&self) -> bool {
        matches!(self, DeployMode::Validation)
    }

    pub fn rolls_back_on_failure(&self) -> bool {
        matches!(self, DeployMode::Promote)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeployMode::Standard => "standard",
            DeployMode::Promote => "promote",
            DeployMode::Validation => "validation",
        }
    }
}

impl fmt::Display for DeployMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
