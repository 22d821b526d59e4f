//! Cross-cutting error types for Kiln.
//!
//! Domain-specific errors (`ManifestError`, `BuildError`, `EnvError`,
//! `RunError`) are defined in their respective crates. A unified error is
//! deferred to `kiln-cli` where all crate errors converge through anyhow.

use thiserror::Error;

/// Errors that can be raised by any Kiln crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No project manifest was found walking up from the start directory.
    #[error("No kiln.toml found in '{start}' or any parent directory")]
    ProjectNotFound { start: String },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
