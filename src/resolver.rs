//! Artifact resolution
//!
//! Dispatches each [`ArtifactRef`] to the strategy for its kind:
//! - Local artifacts are canonicalized (external workspace symlinks point
//!   at the stable `/external/` location)
//! - Remote artifacts are materialized by the injected [`RemoteCache`]
//!
//! Batch resolution is best-effort: misses and cache errors are dropped,
//! so callers needing per-artifact diagnostics use [`ArtifactResolver::resolve_one`].

use crate::artifact::{ArtifactLocation, ArtifactRef};
use crate::canonicalize::canonicalize_path;
use crate::decode::ArtifactDecoder;
use crate::error::ResolveResult;
use crate::remote::RemoteCache;
use crate::session::SessionContext;
use futures_util::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves artifact references to local paths
#[derive(Clone)]
pub struct ArtifactResolver {
    cache: Arc<dyn RemoteCache>,
}

impl ArtifactResolver {
    /// Create a resolver that materializes remote outputs through `cache`
    pub fn new(cache: Arc<dyn RemoteCache>) -> Self {
        Self { cache }
    }

    /// Resolve a single artifact.
    ///
    /// Returns `Ok(None)` when no local file can be produced. Errors from the
    /// remote cache are returned unchanged.
    pub async fn resolve_one(
        &self,
        session: &SessionContext,
        artifact: &ArtifactRef,
    ) -> ResolveResult<Option<PathBuf>> {
        match artifact {
            ArtifactRef::Local { path } => Ok(Some(canonicalize_path(path))),
            ArtifactRef::Remote(output) => self.cache.resolve(session, output).await,
        }
    }

    /// Resolve a batch of artifacts, skipping those without a local file.
    ///
    /// Output keeps input order but may be shorter; duplicates are kept.
    pub async fn resolve_many<'a, I>(&self, session: &SessionContext, artifacts: I) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = &'a ArtifactRef>,
    {
        let lookups = artifacts.into_iter().map(|artifact| async move {
            match self.resolve_one(session, artifact).await {
                Ok(Some(path)) => Some(path),
                Ok(None) => {
                    debug!("No local file for {}", artifact);
                    None
                }
                Err(e) if e.is_integrity_failure() => {
                    warn!("Skipping {}, corrupt cache entry: {}", artifact, e);
                    None
                }
                Err(e) => {
                    warn!("Skipping {}: {}", artifact, e);
                    None
                }
            }
        });

        join_all(lookups).await.into_iter().flatten().collect()
    }

    /// Decode and resolve a single artifact location
    pub async fn resolve_location(
        &self,
        session: &SessionContext,
        decoder: &dyn ArtifactDecoder,
        location: &ArtifactLocation,
    ) -> ResolveResult<Option<PathBuf>> {
        let artifact = decoder.decode(location);
        self.resolve_one(session, &artifact).await
    }

    /// Decode and resolve a batch of locations, skipping unresolvable ones
    pub async fn resolve_locations(
        &self,
        session: &SessionContext,
        decoder: &dyn ArtifactDecoder,
        locations: &[ArtifactLocation],
    ) -> Vec<PathBuf> {
        let artifacts: Vec<ArtifactRef> = locations.iter().map(|l| decoder.decode(l)).collect();
        self.resolve_many(session, &artifacts).await
    }

    /// Name of the remote cache backing this resolver
    pub fn cache_name(&self) -> &'static str {
        self.cache.cache_name()
    }
}

impl std::fmt::Debug for ArtifactResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactResolver")
            .field("cache", &self.cache.cache_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::RemoteRef;
    use crate::decode::WorkspaceDecoder;
    use crate::error::ResolveError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Mutex;

    /// Cache answering from a fixed table and recording every lookup
    #[derive(Default)]
    struct FakeCache {
        entries: HashMap<String, PathBuf>,
        failing: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeCache {
        fn with_entry(mut self, digest: &str, path: &str) -> Self {
            self.entries.insert(digest.to_string(), PathBuf::from(path));
            self
        }

        fn failing_on(mut self, digest: &str) -> Self {
            self.failing.push(digest.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RemoteCache for FakeCache {
        async fn resolve(
            &self,
            _session: &SessionContext,
            output: &RemoteRef,
        ) -> ResolveResult<Option<PathBuf>> {
            self.calls.lock().unwrap().push(output.digest.clone());
            if self.failing.contains(&output.digest) {
                return Err(ResolveError::InvalidDigest(output.digest.clone()));
            }
            Ok(self.entries.get(&output.digest).cloned())
        }

        fn cache_name(&self) -> &'static str {
            "fake"
        }
    }

    fn session() -> SessionContext {
        SessionContext::new("test", "/ws")
    }

    fn remote(digest: &str) -> ArtifactRef {
        ArtifactRef::Remote(RemoteRef::new(digest, format!("bazel-out/bin/{digest}")))
    }

    #[tokio::test]
    async fn local_is_canonicalized_without_touching_cache() {
        let cache = Arc::new(FakeCache::default());
        let resolver = ArtifactResolver::new(cache.clone());

        let artifact =
            ArtifactRef::local("/home/user/.cache/bazel/execroot/myrepo/external/some_dep/file.txt");
        let path = resolver.resolve_one(&session(), &artifact).await.unwrap();

        assert_eq!(path, Some(PathBuf::from("/external/some_dep/file.txt")));
        assert!(cache.calls().is_empty());
    }

    #[tokio::test]
    async fn local_output_paths_pass_through() {
        let resolver = ArtifactResolver::new(Arc::new(FakeCache::default()));
        let raw = "/home/user/.cache/bazel/execroot/myrepo/bazel-out/k8-fastbuild/bin/external/some_dep/file.txt";

        let path = resolver
            .resolve_one(&session(), &ArtifactRef::local(raw))
            .await
            .unwrap();
        assert_eq!(path.as_deref(), Some(Path::new(raw)));
    }

    #[tokio::test]
    async fn remote_result_is_not_canonicalized() {
        let materialized = "/tmp/execroot/x/external/dep/lib.jar";
        let cache = Arc::new(FakeCache::default().with_entry("d1", materialized));
        let resolver = ArtifactResolver::new(cache.clone());

        let path = resolver.resolve_one(&session(), &remote("d1")).await.unwrap();

        assert_eq!(path, Some(PathBuf::from(materialized)));
        assert_eq!(cache.calls(), vec!["d1".to_string()]);
    }

    #[tokio::test]
    async fn remote_miss_is_none() {
        let resolver = ArtifactResolver::new(Arc::new(FakeCache::default()));
        let path = resolver.resolve_one(&session(), &remote("gone")).await.unwrap();
        assert_eq!(path, None);
    }

    #[tokio::test]
    async fn remote_error_propagates_from_single_resolution() {
        let resolver = ArtifactResolver::new(Arc::new(FakeCache::default().failing_on("bad")));
        let err = resolver
            .resolve_one(&session(), &remote("bad"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidDigest(ref d) if d == "bad"));
    }

    #[tokio::test]
    async fn batch_drops_misses_and_keeps_order() {
        let resolver = ArtifactResolver::new(Arc::new(FakeCache::default()));
        let valid = "/ws/execroot/ws/external/dep/a.txt";
        let valid2 = "/ws/src/B.java";

        let artifacts = [
            ArtifactRef::local(valid),
            remote("missing"),
            ArtifactRef::local(valid2),
        ];
        let paths = resolver.resolve_many(&session(), &artifacts).await;

        assert_eq!(
            paths,
            vec![
                canonicalize_path(Path::new(valid)),
                canonicalize_path(Path::new(valid2)),
            ]
        );
    }

    #[tokio::test]
    async fn batch_drops_cache_errors() {
        let cache = FakeCache::default()
            .with_entry("ok", "/out/ok.jar")
            .failing_on("bad");
        let resolver = ArtifactResolver::new(Arc::new(cache));

        let artifacts = [remote("bad"), remote("ok"), ArtifactRef::local("/src/a")];
        let paths = resolver.resolve_many(&session(), &artifacts).await;

        assert_eq!(paths, vec![PathBuf::from("/out/ok.jar"), PathBuf::from("/src/a")]);
    }

    #[tokio::test]
    async fn batch_keeps_duplicates() {
        let resolver = ArtifactResolver::new(Arc::new(FakeCache::default()));
        let artifact = ArtifactRef::local("/src/a");
        let paths = resolver
            .resolve_many(&session(), [&artifact, &artifact])
            .await;
        assert_eq!(paths.len(), 2);
    }

    #[tokio::test]
    async fn batch_of_nothing_is_empty() {
        let resolver = ArtifactResolver::new(Arc::new(FakeCache::default()));
        let none: Vec<ArtifactRef> = Vec::new();
        let paths = resolver.resolve_many(&session(), &none).await;
        assert!(paths.is_empty());
    }

    #[tokio::test]
    async fn locations_are_decoded_then_resolved() {
        let cache = Arc::new(FakeCache::default().with_entry("d1", "/out/remote.jar"));
        let resolver = ArtifactResolver::new(cache.clone());
        let decoder = WorkspaceDecoder::new("/ws", "/home/u/.cache/bazel/execroot/ws")
            .with_remote_outputs([RemoteRef::new("d1", "bazel-out/bin/remote.jar")]);

        let locations = [
            ArtifactLocation::external_source("external/dep/A.java"),
            ArtifactLocation::generated("bazel-out/bin", "remote.jar"),
            ArtifactLocation::source("src/B.java"),
        ];
        let paths = resolver
            .resolve_locations(&session(), &decoder, &locations)
            .await;

        assert_eq!(
            paths,
            vec![
                PathBuf::from("/external/dep/A.java"),
                PathBuf::from("/out/remote.jar"),
                PathBuf::from("/ws/src/B.java"),
            ]
        );

        let single = resolver
            .resolve_location(&session(), &decoder, &locations[1])
            .await
            .unwrap();
        assert_eq!(single, Some(PathBuf::from("/out/remote.jar")));
        assert_eq!(cache.calls().len(), 2);
    }
}
