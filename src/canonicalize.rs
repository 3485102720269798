//! External workspace path canonicalization
//!
//! Bazel exposes external repositories through symlinks under the execution
//! root, whose name changes between builds. Indexers that key caches by path
//! need the stable `/external/...` form instead.

use std::path::{Path, PathBuf};

const EXTERNAL_SEGMENT: &str = "/external/";
const EXECROOT_PREFIX: &str = "/execroot";

/// Output trees that may legitimately contain an `/external/` component
const OUTPUT_TREES: &[&str] = &["/bazel-out/", "/blaze-out/"];

/// Point an external workspace symlink at its stable location.
///
/// Propagates `None` unchanged. See [`canonicalize_path`].
pub fn canonicalize_external_path(path: Option<&Path>) -> Option<PathBuf> {
    path.map(canonicalize_path)
}

/// Rewrite `.../execroot/<name>/external/<rest>` to `/external/<rest>`.
///
/// Only raw external symlinks are rewritten: a path with no `/external/`
/// component, or one that lives under `/bazel-out/` or `/blaze-out/`, is
/// returned as is. The match runs from the first `/execroot` to the last
/// `/external/` after it, and everything up to the end of that match is
/// dropped. Never fails; non UTF-8 paths come back unchanged.
pub fn canonicalize_path(path: &Path) -> PathBuf {
    let Some(text) = path.to_str() else {
        return path.to_path_buf();
    };

    if !is_external_symlink(text) {
        return path.to_path_buf();
    }

    match strip_execroot(text) {
        Some(rest) => PathBuf::from(format!("{EXTERNAL_SEGMENT}{rest}")),
        None => path.to_path_buf(),
    }
}

fn is_external_symlink(text: &str) -> bool {
    text.contains(EXTERNAL_SEGMENT) && !OUTPUT_TREES.iter().any(|tree| text.contains(tree))
}

/// Remainder after the longest `/execroot.*/external/` match, if any
fn strip_execroot(text: &str) -> Option<&str> {
    let start = text.find(EXECROOT_PREFIX)? + EXECROOT_PREFIX.len();
    let tail = &text[start..];
    let external = tail.rfind(EXTERNAL_SEGMENT)?;
    Some(&tail[external + EXTERNAL_SEGMENT.len()..])
}
