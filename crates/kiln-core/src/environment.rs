//! Ephemeral environment descriptors.
//!
//! Environments live under `.kiln/envs/<label>` and are always created by
//! deleting any prior directory first. The descriptor is persisted as
//! `env.json` inside the environment so `kiln env list` can report on it.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What an environment was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EnvPurpose {
    /// Runs the packaging step only.
    Build,
    /// Hosts an editable install for the test entrypoint.
    Test,
    /// Hosts an editable install for the dev server.
    Serve,
}

impl EnvPurpose {
    /// Default environment label for this purpose.
    #[must_use]
    pub const fn default_label(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Test => "test",
            Self::Serve => "serve",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.default_label()
    }
}

impl fmt::Display for EnvPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a package landed in an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InstallMode {
    /// `<name>.link` file pointing at the project source tree.
    Editable,
    /// Payload extracted from a built package archive, RECORD-verified.
    Archive,
}

impl fmt::Display for InstallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Editable => f.write_str("editable"),
            Self::Archive => f.write_str("archive"),
        }
    }
}

/// A package installed into an environment's site directory.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InstalledPackage {
    pub name: String,
    pub mode: InstallMode,
    /// Source path: project root (editable) or archive file (archive).
    pub source: PathBuf,
    pub installed_at: DateTime<Utc>,
}

/// Persisted description of one ephemeral environment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EnvDescriptor {
    pub label: String,
    pub purpose: EnvPurpose,
    pub root: PathBuf,
    pub site: PathBuf,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub installed: Option<InstalledPackage>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn purpose_labels() {
        assert_eq!(EnvPurpose::Build.default_label(), "build");
        assert_eq!(EnvPurpose::Test.default_label(), "test");
        assert_eq!(EnvPurpose::Serve.default_label(), "serve");
    }

    #[test]
    fn descriptor_round_trips_through_json() {
        let descriptor = EnvDescriptor {
            label: "test".to_string(),
            purpose: EnvPurpose::Test,
            root: PathBuf::from("/tmp/.kiln/envs/test"),
            site: PathBuf::from("/tmp/.kiln/envs/test/site"),
            created_at: Utc::now(),
            installed: None,
        };

        let json = serde_json::to_string(&descriptor).unwrap();
        let back: EnvDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back.label, "test");
        assert_eq!(back.purpose, EnvPurpose::Test);
        assert!(back.installed.is_none());
    }
}
