//! Run error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    /// The configured entrypoint script does not exist.
    #[error("Entrypoint script '{path}' does not exist")]
    EntrypointMissing { path: String },

    /// The child process could not be spawned.
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on or signalling the child failed.
    #[error("Child process error: {0}")]
    Child(#[from] std::io::Error),

    /// Watch set collection failed.
    #[error("Watch error: {0}")]
    Watch(#[from] kiln_build::BuildError),
}
