// ABOUTME: Target environment derived from the workspace display name.
// ABOUTME: Selects which substitution values apply to a deployment run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Deployment environment a workspace belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Test,
    Prod,
}

impl Environment {
    /// Infer the environment from a workspace display name.
    ///
    /// Case-insensitive substring match: `prod` wins over `test`, anything
    /// else is `dev`.
    pub fn from_workspace_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("prod") {
            Environment::Prod
        } else if lower.contains("test") {
            Environment::Test
        } else {
            Environment::Dev
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Test => "test",
            Environment::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
