//! # kiln-manifest
//!
//! Parsing, validation, and resolution of the `kiln.toml` project manifest.
//!
//! The manifest is the declarative description of a package: name, version
//! (literal or dynamic via a `VERSION` file), metadata fields, dependency
//! requirements, optional extras groups, build backend settings, and the
//! test/serve entrypoints. All version values are semver; all violations are
//! collected before reporting so `kiln manifest check` can list every problem
//! at once.

mod app;
mod error;
mod schema;
mod validate;

pub use app::{AppObject, AppObjectParseError};
pub use error::ManifestError;
pub use schema::{RawBuild, RawEntrypoints, RawManifest, RawProject};
pub use validate::ValidationReport;

use std::collections::BTreeMap;
use std::path::Path;

use semver::{Version, VersionReq};
use serde::Serialize;

use kiln_core::{MANIFEST_FILE_NAME, VERSION_FILE_NAME};

/// Resolved build backend settings.
#[derive(Debug, Clone, Serialize)]
pub struct BuildSettings {
    pub backend: String,
    pub requires: Option<VersionReq>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

/// Resolved entrypoints.
#[derive(Debug, Clone, Serialize)]
pub struct Entrypoints {
    /// Script path run by `kiln test`, without arguments.
    pub test: Option<String>,
    /// App object served by `kiln serve`.
    pub serve: Option<AppObject>,
}

/// A parsed, validated, and resolved project manifest.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    /// Normalized package name (lowercase, `[a-z0-9._-]`).
    pub name: String,
    pub version: Version,
    /// True when the version came from the `VERSION` file.
    pub version_is_dynamic: bool,
    pub description: String,
    pub authors: Vec<String>,
    pub readme: Option<String>,
    pub license_file: Option<String>,
    pub keywords: Vec<String>,
    pub classifiers: Vec<String>,
    pub requires_runtime: Option<VersionReq>,
    pub urls: BTreeMap<String, String>,
    pub dependencies: BTreeMap<String, VersionReq>,
    pub extras: BTreeMap<String, BTreeMap<String, VersionReq>>,
    pub build: BuildSettings,
    pub entrypoints: Entrypoints,
}

impl Manifest {
    /// Load and resolve the manifest from `<project_root>/kiln.toml`.
    ///
    /// When the manifest declares `dynamic = ["version"]`, the version is
    /// read from `<project_root>/VERSION` (trimmed). Any validation
    /// violation fails the load with [`ManifestError::Invalid`].
    pub fn load(project_root: &Path) -> Result<Self, ManifestError> {
        let manifest_path = project_root.join(MANIFEST_FILE_NAME);
        let text = read_file(&manifest_path)?;
        let raw: RawManifest = toml::from_str(&text)?;

        let version_file = read_version_file(project_root, &raw)?;
        Self::resolve(raw, version_file.as_deref())
    }

    /// Resolve a raw manifest into a validated [`Manifest`].
    ///
    /// `version_file` is the trimmed contents of the `VERSION` file, when one
    /// exists. Exposed for tests and in-memory callers; [`Self::load`] is the
    /// filesystem entry point.
    pub fn resolve(raw: RawManifest, version_file: Option<&str>) -> Result<Self, ManifestError> {
        let violations = validate::collect_violations(&raw, version_file);
        if !violations.is_empty() {
            return Err(ManifestError::Invalid { violations });
        }

        let name = validate::normalize_name(&raw.project.name)
            .unwrap_or_else(|_| raw.project.name.clone());

        let version_is_dynamic = raw.project.dynamic.iter().any(|d| d == "version");
        let version_str = if version_is_dynamic {
            version_file.unwrap_or_default().trim().to_string()
        } else {
            raw.project.version.clone().unwrap_or_default()
        };
        // Parse failures were already collected as violations above.
        let version = Version::parse(&version_str).map_err(|e| ManifestError::Invalid {
            violations: vec![format!("version '{version_str}': {e}")],
        })?;

        Ok(Self {
            name,
            version,
            version_is_dynamic,
            description: raw.project.description,
            authors: raw.project.authors,
            readme: raw.project.readme,
            license_file: raw.project.license_file,
            keywords: raw.project.keywords,
            classifiers: raw.project.classifiers,
            requires_runtime: parse_req_opt(raw.project.requires_runtime.as_deref()),
            urls: raw.project.urls,
            dependencies: parse_req_map(&raw.project.dependencies),
            extras: raw
                .project
                .extras
                .iter()
                .map(|(group, deps)| (group.clone(), parse_req_map(deps)))
                .collect(),
            build: BuildSettings {
                backend: raw.build.backend,
                requires: parse_req_opt(raw.build.requires.as_deref()),
                include: raw.build.include,
                exclude: raw.build.exclude,
            },
            entrypoints: Entrypoints {
                test: raw.entrypoints.test,
                serve: raw
                    .entrypoints
                    .serve
                    .as_deref()
                    .and_then(|s| s.parse().ok()),
            },
        })
    }

    /// Validate `<project_root>/kiln.toml` without resolving.
    ///
    /// Unlike [`Self::load`], parse errors are reported as violations rather
    /// than hard errors, so `kiln manifest check` always produces a report.
    pub fn check(project_root: &Path) -> Result<ValidationReport, ManifestError> {
        let manifest_path = project_root.join(MANIFEST_FILE_NAME);
        let text = read_file(&manifest_path)?;

        let raw: RawManifest = match toml::from_str(&text) {
            Ok(raw) => raw,
            Err(e) => {
                return Ok(ValidationReport {
                    valid: false,
                    violations: vec![format!("parse error: {e}")],
                });
            }
        };

        let version_file = read_version_file(project_root, &raw)?;
        let violations = validate::collect_violations(&raw, version_file.as_deref());
        Ok(ValidationReport {
            valid: violations.is_empty(),
            violations,
        })
    }

    /// `name-version` string used in artifact and staging directory names.
    #[must_use]
    pub fn name_version(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

fn read_file(path: &Path) -> Result<String, ManifestError> {
    std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Read the `VERSION` file when the manifest declares a dynamic version.
/// A missing file is reported as a violation later, not an I/O error here.
fn read_version_file(
    project_root: &Path,
    raw: &RawManifest,
) -> Result<Option<String>, ManifestError> {
    if !raw.project.dynamic.iter().any(|d| d == "version") {
        return Ok(None);
    }
    let path = project_root.join(VERSION_FILE_NAME);
    if !path.is_file() {
        return Ok(None);
    }
    read_file(&path).map(|text| Some(text.trim().to_string()))
}

fn parse_req_opt(req: Option<&str>) -> Option<VersionReq> {
    req.and_then(|r| VersionReq::parse(r).ok())
}

fn parse_req_map(map: &BTreeMap<String, String>) -> BTreeMap<String, VersionReq> {
    map.iter()
        .filter_map(|(name, req)| VersionReq::parse(req).ok().map(|r| (name.clone(), r)))
        .collect()
}
