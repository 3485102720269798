//! Session context passed through to the remote cache

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identifies the consuming session (IDE project, indexer run, ...)
///
/// The resolver never reads it; remote caches use it to scope the files
/// they materialize. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

#[derive(Debug, PartialEq, Eq)]
struct SessionInner {
    name: String,
    workspace_root: PathBuf,
}

impl SessionContext {
    /// Create a new session context
    pub fn new(name: impl Into<String>, workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                name: name.into(),
                workspace_root: workspace_root.into(),
            }),
        }
    }

    /// Session name as given by the caller
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Root of the workspace this session indexes
    pub fn workspace_root(&self) -> &Path {
        &self.inner.workspace_root
    }

    /// Directory name derived from the session name.
    ///
    /// Path separators and other unusual characters are replaced so the
    /// name never escapes the directory it is joined onto.
    pub fn dir_name(&self) -> String {
        let name: String = self
            .inner
            .name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        match name.as_str() {
            "" | "." | ".." => "default".to_string(),
            _ => name,
        }
    }
}
