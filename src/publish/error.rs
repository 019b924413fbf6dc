// ABOUTME: Error types for remote publish operations.
// ABOUTME: Covers endpoint configuration, transport, HTTP status, and response failures.

use std::time::Duration;

use crate::types::ArtifactKind;

/// Errors returned by a `Publisher`.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The configured endpoint can't be used.
    #[error("invalid API endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// TCP connect or HTTP handshake failed.
    #[error("failed to connect to {0}")]
    Connect(String),

    /// The request could not be built or sent.
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("{method} {path} returned {status}: {body}")]
    Status {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    /// The request did not complete in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// No workspace with the given display name.
    #[error("workspace not found: {0}")]
    WorkspaceNotFound(String),

    /// The response body wasn't what the service contract promises.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The service has no collection for this kind.
    #[error("no remote collection for {0} artifacts")]
    UnsupportedKind(ArtifactKind),
}
