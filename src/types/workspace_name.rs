// ABOUTME: Workspace display name validation.
// ABOUTME: Rejects empty and padded names before any remote lookup happens.

use std::fmt;
use thiserror::Error;

use super::Environment;

const MAX_LEN: usize = 256;

#[derive(Debug, Error)]
pub enum WorkspaceNameError {
    #[error("workspace name cannot be empty")]
    Empty,

    #[error("workspace name exceeds maximum length of {MAX_LEN} characters")]
    TooLong,

    #[error("workspace name cannot start or end with whitespace")]
    SurroundingWhitespace,

    #[error("invalid character in workspace name: {0:?}")]
    InvalidChar(char),
}

/// Display name of the target workspace, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkspaceName(String);

impl WorkspaceName {
    pub fn new(value: &str) -> Result<Self, WorkspaceNameError> {
        if value.is_empty() {
            return Err(WorkspaceNameError::Empty);
        }

        if value.chars().count() > MAX_LEN {
            return Err(WorkspaceNameError::TooLong);
        }

        if value.trim() != value {
            return Err(WorkspaceNameError::SurroundingWhitespace);
        }

        if let Some(c) = value.chars().find(|c| c.is_control()) {
            return Err(WorkspaceNameError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The environment this workspace deploys into.
    pub fn environment(&self) -> Environment {
        Environment::from_workspace_name(&self.0)
    }
}

impl fmt::Display for WorkspaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for WorkspaceName {
    type Err = WorkspaceNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
