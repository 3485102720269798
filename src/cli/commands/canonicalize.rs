//! Canonicalize command - print stable paths for external symlinks

use crate::canonicalize::canonicalize_path;
use crate::cli::args::CanonicalizeArgs;
use crate::error::ResolveResult;

/// Execute the canonicalize command
pub async fn execute(args: CanonicalizeArgs) -> ResolveResult<()> {
    for path in &args.paths {
        println!("{}", canonicalize_path(path).display());
    }
    Ok(())
}
