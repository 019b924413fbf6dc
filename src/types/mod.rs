// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Artifact classification, workspace names and ids, target environments.

mod artifact;
mod environment;
mod id;
mod workspace_name;

pub use artifact::{
    Artifact, ArtifactKind, KindCategory, RECOGNIZED_DIRECTORIES, has_recognized_directory,
    has_recognized_suffix,
};
pub use environment::Environment;
pub use id::{Id, WorkspaceId, WorkspaceMarker};
pub use workspace_name::{WorkspaceName, WorkspaceNameError};
