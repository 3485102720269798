//! Artifact references and locations
//!
//! An [`ArtifactRef`] is what a decoder hands to the resolver: either a file
//! already on local disk or a handle into the remote output cache.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A build artifact, either on local disk or only known to the remote cache
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ArtifactRef {
    /// Artifact already materialized on local disk
    Local { path: PathBuf },

    /// Artifact that must be materialized from the remote cache
    Remote(RemoteRef),
}

impl ArtifactRef {
    /// Create a local artifact reference
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }

    /// Whether resolving this reference goes through the remote cache
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl From<RemoteRef> for ArtifactRef {
    fn from(remote: RemoteRef) -> Self {
        Self::Remote(remote)
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { path } => write!(f, "local:{}", path.display()),
            Self::Remote(remote) => write!(f, "remote:{}", remote),
        }
    }
}

/// Handle to an output held by the remote cache
///
/// The resolver never looks inside; only [`RemoteCache`](crate::remote::RemoteCache)
/// implementations interpret these fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteRef {
    /// SHA-256 of the content, lowercase hex
    pub digest: String,

    /// Exec-root relative path of the output (`bazel-out/k8-fastbuild/bin/...`)
    pub relative_path: String,

    /// Content length, when the build event stream reported it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

impl RemoteRef {
    pub fn new(digest: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self {
            digest: digest.into(),
            relative_path: relative_path.into(),
            size_bytes: None,
        }
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }

    /// Final path component of the output, used when materializing
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or(&self.digest)
    }
}

impl fmt::Display for RemoteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.relative_path, self.digest)
    }
}

/// Abstract location of a build artifact as reported by the IDE aspect
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactLocation {
    /// Output root relative to the execution root (empty for sources)
    pub root_exec_path: String,

    /// Path relative to the root
    pub relative_path: String,

    /// Whether this is a source file rather than a generated output
    pub is_source: bool,

    /// Whether the artifact lives in an external repository
    pub is_external: bool,
}

impl ArtifactLocation {
    /// A source file in the main workspace
    pub fn source(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            is_source: true,
            ..Default::default()
        }
    }

    /// A source file in an external repository (`external/<repo>/...`)
    pub fn external_source(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            is_source: true,
            is_external: true,
            ..Default::default()
        }
    }

    /// A generated output under `root_exec_path`
    pub fn generated(root_exec_path: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self {
            root_exec_path: root_exec_path.into(),
            relative_path: relative_path.into(),
            ..Default::default()
        }
    }

    /// Path relative to the execution root
    pub fn exec_path(&self) -> String {
        if self.root_exec_path.is_empty() {
            self.relative_path.clone()
        } else {
            Path::new(&self.root_exec_path)
                .join(&self.relative_path)
                .to_string_lossy()
                .into_owned()
        }
    }
}
