//! Environment error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
    /// Filesystem operation failed.
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// No environment with the given label exists.
    #[error("Environment '{label}' does not exist")]
    NotFound { label: String },

    /// The persisted `env.json` could not be read or written.
    #[error("Environment descriptor error: {0}")]
    Descriptor(#[from] serde_json::Error),

    /// Archive reading failed.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The package archive carries no RECORD entry.
    #[error("Archive '{archive}' has no RECORD entry")]
    MissingRecord { archive: String },

    /// A payload entry's hash does not match its RECORD line.
    #[error("RECORD hash mismatch for '{entry}' in '{archive}'")]
    RecordMismatch { archive: String, entry: String },

    /// An archive entry would extract outside the site directory.
    #[error("Archive entry '{entry}' has an unsafe path")]
    UnsafeEntry { entry: String },

    /// The package does not resolve from the environment.
    #[error("Package '{name}' is not resolvable from environment '{label}'")]
    NotResolvable { name: String, label: String },
}

impl EnvError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
