//! CLI command implementations

pub mod canonicalize;
pub mod config;
pub mod resolve;

pub use canonicalize::execute as canonicalize;
pub use config::execute as config;
pub use resolve::execute as resolve;
pub use resolve::execute_one as resolve_one;
