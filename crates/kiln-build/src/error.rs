//! Build error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    /// Filesystem operation failed.
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An include/exclude glob from the manifest did not parse.
    #[error("Invalid glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: ignore::Error,
    },

    /// Directory walk failed.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Archive writing failed.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A staged file escaped the staging root.
    #[error("Path '{path}' is outside the project root")]
    OutsideRoot { path: String },
}

impl BuildError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
