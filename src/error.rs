// error.rs - Error types for ApexRecon
// Only configuration errors are fatal. Everything raised while a target runs is
// folded into a typed result and logged instead.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal, pre-run configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no target given: use --target <domain> or --list <file>")]
    MissingTarget,

    #[error("--target and --list are mutually exclusive")]
    ConflictingTargets,

    #[error("target list not found: {}", .0.display())]
    ListNotFound(PathBuf),

    #[error("failed to read target list {}: {source}", .path.display())]
    ListUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value for {flag}: {reason}")]
    InvalidValue { flag: &'static str, reason: String },
}

/// Failure to lay out a run workspace on disk
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
