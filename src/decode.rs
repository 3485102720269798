//! Decoding artifact locations into artifact references

use crate::artifact::{ArtifactLocation, ArtifactRef, RemoteRef};
use std::collections::HashMap;
use std::path::PathBuf;

/// Turns an abstract [`ArtifactLocation`] into a concrete [`ArtifactRef`]
pub trait ArtifactDecoder: Send + Sync {
    fn decode(&self, location: &ArtifactLocation) -> ArtifactRef;
}

/// Decoder for a local workspace whose outputs may live in a remote cache
///
/// - Main-repo sources resolve against the workspace root.
/// - External sources resolve against the execution root, where Bazel keeps
///   the `external/` symlinks.
/// - Generated outputs registered as remote become [`ArtifactRef::Remote`];
///   the rest resolve against the execution root.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceDecoder {
    workspace_root: PathBuf,
    execution_root: PathBuf,
    remote_outputs: HashMap<String, RemoteRef>,
}

impl WorkspaceDecoder {
    pub fn new(workspace_root: impl Into<PathBuf>, execution_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            execution_root: execution_root.into(),
            remote_outputs: HashMap::new(),
        }
    }

    /// Register outputs that exist only in the remote cache, keyed by their
    /// exec-root relative path
    pub fn with_remote_outputs(mut self, outputs: impl IntoIterator<Item = RemoteRef>) -> Self {
        self.remote_outputs.extend(
            outputs
                .into_iter()
                .map(|output| (output.relative_path.clone(), output)),
        );
        self
    }

    /// Number of registered remote outputs
    pub fn remote_output_count(&self) -> usize {
        self.remote_outputs.len()
    }
}

impl ArtifactDecoder for WorkspaceDecoder {
    fn decode(&self, location: &ArtifactLocation) -> ArtifactRef {
        if location.is_source {
            let root = if location.is_external {
                &self.execution_root
            } else {
                &self.workspace_root
            };
            return ArtifactRef::local(root.join(&location.relative_path));
        }

        let exec_path = location.exec_path();
        match self.remote_outputs.get(&exec_path) {
            Some(remote) => ArtifactRef::Remote(remote.clone()),
            None => ArtifactRef::local(self.execution_root.join(exec_path)),
        }
    }
}
