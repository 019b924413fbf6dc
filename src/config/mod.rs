// ABOUTME: Configuration types and parsing for promoter.yml.
// ABOUTME: API endpoint settings, workspace id overrides, and substitution parameters.

mod env_value;
mod parameters;

pub use env_value::{EnvValue, MissingEnvVar};
pub use parameters::{FindReplace, KeyValueReplace, ParameterRules};

use crate::error::{Error, Result};
use crate::types::WorkspaceId;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "promoter.yml";
pub const CONFIG_FILENAME_ALT: &str = "promoter.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".promoter/config.yml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    /// Display name to workspace id, skipping the remote lookup.
    #[serde(default)]
    pub workspaces: HashMap<String, WorkspaceId>,

    #[serde(default)]
    pub parameters: ParameterRules,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub token: Option<EnvValue>,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: None,
            timeout: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Look for a config file in `dir`. Falls back to defaults when none exists.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load(path);
            }
        }

        tracing::debug!(dir = %dir.display(), "no config file found, using defaults");
        Ok(Self::default())
    }

    /// Workspace id configured for a display name, if any.
    pub fn workspace_id(&self, display_name: &str) -> Option<&WorkspaceId> {
        self.workspaces.get(display_name)
    }
}
