//! Artifact descriptors and build reports.
//!
//! A build produces exactly two artifacts: a source archive (`.src.zip`) and
//! a built package archive (`.pkg.zip`). Both are described here; the
//! producing logic lives in `kiln-build`.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of distribution artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Source archive: the staged source tree plus the manifest.
    Src,
    /// Built package archive: payload plus METADATA and RECORD.
    Pkg,
}

impl ArtifactKind {
    /// File name suffix for this kind, including the extension.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Src => ".src.zip",
            Self::Pkg => ".pkg.zip",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Src => "src",
            Self::Pkg => "pkg",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One produced artifact under `dist/`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactDescriptor {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Hex sha256 of the archive file itself.
    pub sha256: String,
}

/// Result of a completed build.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BuildReport {
    pub name: String,
    pub version: String,
    pub dist_dir: PathBuf,
    pub artifacts: Vec<ArtifactDescriptor>,
    pub staged_files: u64,
    pub built_at: DateTime<Utc>,
}

impl BuildReport {
    /// The artifact of the given kind, if present.
    #[must_use]
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&ArtifactDescriptor> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }
}

/// Canonical artifact file name: `<name>-<version><suffix>`.
#[must_use]
pub fn artifact_file_name(name: &str, version: &str, kind: ArtifactKind) -> String {
    format!("{name}-{version}{}", kind.suffix())
}
