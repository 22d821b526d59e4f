//! Raw serde shapes for `kiln.toml`.
//!
//! These structs mirror the on-disk TOML exactly (kebab-case keys, all
//! optional where the format allows). Resolution and validation into the
//! public [`crate::Manifest`] happens in the crate root.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawManifest {
    pub project: RawProject,
    #[serde(default)]
    pub build: RawBuild,
    #[serde(default)]
    pub entrypoints: RawEntrypoints,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawProject {
    #[serde(default)]
    pub name: String,
    /// Literal version; mutually exclusive with `dynamic = ["version"]`.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub readme: Option<String>,
    #[serde(default)]
    pub license_file: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub classifiers: Vec<String>,
    /// Minimum runtime version requirement, e.g. `">=1.75"`.
    #[serde(default)]
    pub requires_runtime: Option<String>,
    /// Fields resolved outside the manifest; only `"version"` is understood.
    #[serde(default)]
    pub dynamic: Vec<String>,
    #[serde(default)]
    pub urls: BTreeMap<String, String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    /// Optional dependency groups, e.g. `sql`, `all`.
    #[serde(default)]
    pub extras: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawBuild {
    /// Build backend name; only `"kiln"` is understood.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Minimum backend version requirement.
    #[serde(default)]
    pub requires: Option<String>,
    /// Staging include globs; empty means walk everything not ignored.
    #[serde(default)]
    pub include: Vec<String>,
    /// Staging exclude globs.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_backend() -> String {
    "kiln".to_string()
}

impl Default for RawBuild {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            requires: None,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawEntrypoints {
    /// Script path run by `kiln test`, without extension, e.g. `tests/frontend`.
    #[serde(default)]
    pub test: Option<String>,
    /// App object path served by `kiln serve`, e.g. `tests/asgi:asgi_app`.
    #[serde(default)]
    pub serve: Option<String>,
}
