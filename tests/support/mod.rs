// ABOUTME: Test support utilities.
// ABOUTME: Recording mock publisher plus bundle and repository tree fixtures.

use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;
use promoter::publish::{PublishError, Publisher};
use promoter::types::{ArtifactKind, WorkspaceId, WorkspaceName};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("promoter=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A publisher call as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Call {
    ResolveWorkspace(String),
    Notebook(String),
    Pipeline(String),
    Dataflow(String),
    Delete(ArtifactKind, String),
    Restore(ArtifactKind, String),
}

/// Publisher that records every call and fails for configured names.
///
/// Pipelines carry no name, so a pipeline call fails when its body contains
/// one of the failing names.
#[derive(Default)]
#[allow(dead_code)]
pub struct MockPublisher {
    calls: Mutex<Vec<Call>>,
    failing: HashSet<String>,
}

#[allow(dead_code)]
impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(names: &[&str]) -> Self {
        Self {
            calls: Mutex::default(),
            failing: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call, key: &str) -> Result<(), PublishError> {
        let fails = self.failing.iter().any(|f| key.contains(f.as_str()));
        self.calls.lock().unwrap().push(call);
        if fails {
            Err(PublishError::Status {
                method: "PUT".to_string(),
                path: format!("/mock/{key}"),
                status: 500,
                body: "mock failure".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn resolve_workspace(&self, name: &WorkspaceName) -> Result<WorkspaceId, PublishError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::ResolveWorkspace(name.to_string()));
        Ok(WorkspaceId::new(format!("id-{name}")))
    }

    async fn publish_notebook(
        &self,
        _workspace: &WorkspaceId,
        name: &str,
        _content: &[u8],
    ) -> Result<(), PublishError> {
        self.record(Call::Notebook(name.to_string()), name)
    }

    async fn publish_pipeline(
        &self,
        _workspace: &WorkspaceId,
        body: &str,
    ) -> Result<(), PublishError> {
        self.record(Call::Pipeline(body.to_string()), body)
    }

    async fn publish_dataflow(
        &self,
        _workspace: &WorkspaceId,
        name: &str,
        _body: &Value,
    ) -> Result<(), PublishError> {
        self.record(Call::Dataflow(name.to_string()), name)
    }

    async fn delete_item(
        &self,
        _workspace: &WorkspaceId,
        kind: ArtifactKind,
        name: &str,
    ) -> Result<(), PublishError> {
        self.record(Call::Delete(kind, name.to_string()), name)
    }

    async fn restore_item(
        &self,
        _workspace: &WorkspaceId,
        kind: ArtifactKind,
        name: &str,
        _previous_state: &Value,
    ) -> Result<(), PublishError> {
        self.record(Call::Restore(kind, name.to_string()), name)
    }
}

/// Write a tar bundle (gzip-compressed when `gzip` is set) into `dir`.
#[allow(dead_code)]
pub fn write_bundle(dir: &Path, files: &[(&str, &[u8])], gzip: bool) -> PathBuf {
    let path = dir.join(if gzip { "bundle.tar.gz" } else { "bundle.tar" });
    let file = fs::File::create(&path).unwrap();

    if gzip {
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        append_files(&mut builder, files);
        builder.into_inner().unwrap().finish().unwrap();
    } else {
        let mut builder = tar::Builder::new(file);
        append_files(&mut builder, files);
        builder.finish().unwrap();
    }
    path
}

#[allow(dead_code)]
fn append_files<W: std::io::Write>(builder: &mut tar::Builder<W>, files: &[(&str, &[u8])]) {
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *content).unwrap();
    }
}

/// Lay out files under `dir`, creating parent directories.
#[allow(dead_code)]
pub fn write_tree(dir: &Path, files: &[(&str, &[u8])]) {
    for (name, content) in files {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}
