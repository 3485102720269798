//! Resolve commands - turn artifact references into local paths

use crate::artifact::ArtifactRef;
use crate::cli::args::{OutputFormat, ResolveArgs, ResolveOneArgs, SessionArgs};
use crate::config::Config;
use crate::error::{ResolveError, ResolveResult};
use crate::remote::DiskCache;
use crate::resolver::ArtifactResolver;
use crate::session::SessionContext;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, config: &Config) -> ResolveResult<()> {
    let artifacts = read_manifest(&args.manifest).await?;
    let session = session_context(&args.session, config)?;
    let resolver = build_resolver(config);

    debug!(
        "Resolving {} artifacts for session {} via {} cache",
        artifacts.len(),
        session.name(),
        resolver.cache_name()
    );

    let paths = resolver.resolve_many(&session, &artifacts).await;
    debug!("Resolved {} of {}", paths.len(), artifacts.len());

    match args.format {
        OutputFormat::Plain => {
            for path in &paths {
                println!("{}", path.display());
            }
        }
        OutputFormat::Json => {
            let paths: Vec<String> = paths
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
            println!("{}", serde_json::to_string_pretty(&paths)?);
        }
    }

    Ok(())
}

/// Execute the resolve-one command
pub async fn execute_one(args: ResolveOneArgs, config: &Config) -> ResolveResult<()> {
    let artifact: ArtifactRef = serde_json::from_str(&args.artifact)?;
    let session = session_context(&args.session, config)?;
    let resolver = build_resolver(config);

    match resolver.resolve_one(&session, &artifact).await? {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => Err(ResolveError::NotFound(artifact.to_string())),
    }
}

fn build_resolver(config: &Config) -> ArtifactResolver {
    let cache = DiskCache::new(&config.cache.cas_dir, &config.cache.output_dir);
    ArtifactResolver::new(Arc::new(cache))
}

fn session_context(args: &SessionArgs, config: &Config) -> ResolveResult<SessionContext> {
    let name = args
        .session
        .clone()
        .unwrap_or_else(|| config.session.name.clone());

    let workspace_root = match args
        .workspace
        .clone()
        .or_else(|| config.session.workspace_root.clone())
    {
        Some(root) => root,
        None => std::env::current_dir()
            .map_err(|e| ResolveError::io("getting current directory", e))?,
    };

    Ok(SessionContext::new(name, workspace_root))
}

async fn read_manifest(path: &Path) -> ResolveResult<Vec<ArtifactRef>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ResolveError::io(format!("reading manifest {}", path.display()), e))?;

    parse_manifest(&content).map_err(|e| ResolveError::ManifestInvalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn parse_manifest(content: &str) -> serde_json::Result<Vec<ArtifactRef>> {
    serde_json::from_str(content)
}
