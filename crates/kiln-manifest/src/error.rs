//! Manifest error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    /// Manifest or version file could not be read.
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or shape error.
    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),

    /// The manifest parsed but violates validation rules.
    #[error("Invalid manifest: {}", violations.join("; "))]
    Invalid { violations: Vec<String> },
}
