// ABOUTME: Artifact classification by file name and directory membership.
// ABOUTME: Maps a relative path to a closed ArtifactKind and derives the artifact name.

use serde::{Deserialize, Serialize};
use std::fmt;

const NOTEBOOK_SUFFIXES: &[&str] = &[".ipynb", ".py"];
const PIPELINE_SUFFIX: &str = ".pipeline.json";
const DATAFLOW_SUFFIX: &str = ".dataflow.json";
const SPARK_JOB_MARKER: &str = "sparkjobdefinition";

/// Directory names that admit a file from a repository tree even when its
/// suffix is not recognized.
pub const RECOGNIZED_DIRECTORIES: &[&str] =
    &["notebooks", "pipelines", "dataflows", "sparkjobdefinitions"];

/// What a file in a bundle or repository is, as far as deployment goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Notebook,
    Pipeline,
    Dataflow,
    SparkJob,
    Unrecognized,
}

impl ArtifactKind {
    /// Classify a relative path. First matching rule wins:
    ///
    /// 1. notebook or plain code suffix
    /// 2. `.pipeline.json`
    /// 3. `.dataflow.json`
    /// 4. file name contains `sparkjobdefinition` (any case)
    pub fn classify(path: &str) -> Self {
        if NOTEBOOK_SUFFIXES.iter().any(|s| path.ends_with(s)) {
            ArtifactKind::Notebook
        } else if path.ends_with(PIPELINE_SUFFIX) {
            ArtifactKind::Pipeline
        } else if path.ends_with(DATAFLOW_SUFFIX) {
            ArtifactKind::Dataflow
        } else if file_name(path).to_lowercase().contains(SPARK_JOB_MARKER) {
            ArtifactKind::SparkJob
        } else {
            ArtifactKind::Unrecognized
        }
    }

    /// Statistics bucket for this kind. `None` for unrecognized files, which
    /// are never dispatched.
    pub fn category(&self) -> Option<KindCategory> {
        match self {
            ArtifactKind::Notebook => Some(KindCategory::Notebooks),
            ArtifactKind::Pipeline => Some(KindCategory::Pipelines),
            ArtifactKind::Dataflow => Some(KindCategory::Dataflows),
            ArtifactKind::SparkJob => Some(KindCategory::SparkJobs),
            ArtifactKind::Unrecognized => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Notebook => "notebook",
            ArtifactKind::Pipeline => "pipeline",
            ArtifactKind::Dataflow => "dataflow",
            ArtifactKind::SparkJob => "spark_job",
            ArtifactKind::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping used by deployment statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindCategory {
    Notebooks,
    Pipelines,
    Dataflows,
    SparkJobs,
}

impl KindCategory {
    pub const ALL: [KindCategory; 4] = [
        KindCategory::Notebooks,
        KindCategory::Pipelines,
        KindCategory::Dataflows,
        KindCategory::SparkJobs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KindCategory::Notebooks => "notebooks",
            KindCategory::Pipelines => "pipelines",
            KindCategory::Dataflows => "dataflows",
            KindCategory::SparkJobs => "spark_jobs",
        }
    }
}

/// Whether the path's suffix alone is enough to classify it.
pub fn has_recognized_suffix(path: &str) -> bool {
    ArtifactKind::classify(path) != ArtifactKind::Unrecognized
}

/// Whether any directory component of the path is a recognized artifact
/// directory. The file name itself is not considered.
pub fn has_recognized_directory(path: &str) -> bool {
    let mut segments: Vec<&str> = path.split('/').collect();
    segments.pop();
    segments
        .iter()
        .any(|segment| RECOGNIZED_DIRECTORIES.contains(segment))
}

/// A classified, deployable artifact read from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: String,
    name: String,
    kind: ArtifactKind,
    category: KindCategory,
    content: Vec<u8>,
}

impl Artifact {
    /// Classify a source entry. Returns `None` for unrecognized files.
    pub fn admit(path: impl Into<String>, content: Vec<u8>) -> Option<Self> {
        let path = path.into();
        let kind = ArtifactKind::classify(&path);
        let category = kind.category()?;
        let name = artifact_name(&path, kind);
        Some(Self {
            path,
            name,
            kind,
            category,
            content,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn category(&self) -> KindCategory {
        self.category
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Stem of the file name with the suffix that classified it removed.
fn artifact_name(path: &str, kind: ArtifactKind) -> String {
    let file = file_name(path);
    let stem = match kind {
        ArtifactKind::Notebook => NOTEBOOK_SUFFIXES
            .iter()
            .find_map(|s| file.strip_suffix(s)),
        ArtifactKind::Pipeline => file.strip_suffix(PIPELINE_SUFFIX),
        ArtifactKind::Dataflow => file.strip_suffix(DATAFLOW_SUFFIX),
        ArtifactKind::SparkJob | ArtifactKind::Unrecognized => {
            file.rsplit_once('.').map(|(stem, _)| stem)
        }
    };

    match stem {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file.to_string(),
    }
}
