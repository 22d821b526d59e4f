//! Manifest validation rules.
//!
//! All rules are collected into a flat violation list so callers can report
//! everything at once instead of failing at the first problem.

use schemars::JsonSchema;
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

use crate::schema::RawManifest;

/// Result of `kiln manifest check`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<String>,
}

/// Normalize a package name: lowercase, `[a-z0-9._-]` only.
pub fn normalize_name(name: &str) -> Result<String, String> {
    let normalized = name.trim().to_lowercase();
    if normalized.is_empty() {
        return Err("name must not be empty".to_string());
    }
    if let Some(bad) = normalized
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-')))
    {
        return Err(format!(
            "name '{name}' contains invalid character '{bad}' (allowed: a-z, 0-9, '.', '_', '-')"
        ));
    }
    Ok(normalized)
}

/// Collect every validation violation in `raw`.
///
/// `version_file` is the trimmed contents of the `VERSION` file when one
/// exists next to the manifest.
pub fn collect_violations(raw: &RawManifest, version_file: Option<&str>) -> Vec<String> {
    let mut violations = Vec::new();

    if let Err(reason) = normalize_name(&raw.project.name) {
        violations.push(reason);
    }

    check_version(raw, version_file, &mut violations);
    check_requirements(raw, &mut violations);

    for entry in &raw.project.dynamic {
        if entry != "version" {
            violations.push(format!("unsupported dynamic field '{entry}'"));
        }
    }

    if raw.build.backend != "kiln" {
        violations.push(format!(
            "unsupported build backend '{}' (only 'kiln' is supported)",
            raw.build.backend
        ));
    }

    if let Some(serve) = &raw.entrypoints.serve {
        if serve.parse::<crate::AppObject>().is_err() {
            violations.push(format!(
                "serve entrypoint '{serve}' is not a 'module:object' path"
            ));
        }
    }

    violations
}

fn check_version(raw: &RawManifest, version_file: Option<&str>, violations: &mut Vec<String>) {
    let dynamic = raw.project.dynamic.iter().any(|d| d == "version");

    if dynamic {
        if raw.project.version.is_some() {
            violations
                .push("version is dynamic but the manifest also sets a literal version".to_string());
        }
        match version_file {
            None => violations.push("version is dynamic but no VERSION file exists".to_string()),
            Some(text) => push_bad_version(text, "VERSION file", violations),
        }
    } else {
        match raw.project.version.as_deref() {
            None => violations.push(
                "version is required (set project.version or dynamic = [\"version\"])".to_string(),
            ),
            Some(text) => push_bad_version(text, "project.version", violations),
        }
    }
}

fn push_bad_version(text: &str, field: &str, violations: &mut Vec<String>) {
    if let Err(e) = Version::parse(text.trim()) {
        violations.push(format!("{field} '{}' is not semver: {e}", text.trim()));
    }
}

fn check_requirements(raw: &RawManifest, violations: &mut Vec<String>) {
    if let Some(req) = &raw.project.requires_runtime {
        push_bad_req(req, "requires-runtime", violations);
    }
    if let Some(req) = &raw.build.requires {
        push_bad_req(req, "build.requires", violations);
    }
    for (name, req) in &raw.project.dependencies {
        push_bad_req(req, &format!("dependency '{name}'"), violations);
    }
    for (group, deps) in &raw.project.extras {
        for (name, req) in deps {
            push_bad_req(req, &format!("extra '{group}' dependency '{name}'"), violations);
        }
    }
}

fn push_bad_req(text: &str, field: &str, violations: &mut Vec<String>) {
    if let Err(e) = VersionReq::parse(text) {
        violations.push(format!("{field} requirement '{text}' is not valid: {e}"));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("haru", "haru")]
    #[case("Haru", "haru")]
    #[case("my_pkg.ext-2", "my_pkg.ext-2")]
    fn normalizes_valid_names(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_name(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("has space")]
    #[case("emoji✨")]
    fn rejects_invalid_names(#[case] input: &str) {
        assert!(normalize_name(input).is_err());
    }

    #[test]
    fn clean_manifest_has_no_violations() {
        let raw: RawManifest = toml::from_str(
            r#"
            [project]
            name = "haru"
            version = "0.1.0"
        "#,
        )
        .unwrap();
        assert_eq!(collect_violations(&raw, None), Vec::<String>::new());
    }

    #[test]
    fn extras_requirements_are_checked() {
        let raw: RawManifest = toml::from_str(
            r#"
            [project]
            name = "haru"
            version = "0.1.0"

            [project.extras]
            sql = { relational-mapping = "not a req" }
        "#,
        )
        .unwrap();
        let violations = collect_violations(&raw, None);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("extra 'sql'"));
    }

    #[test]
    fn dynamic_version_requires_version_file() {
        let raw: RawManifest = toml::from_str(
            r#"
            [project]
            name = "haru"
            dynamic = ["version"]
        "#,
        )
        .unwrap();
        let violations = collect_violations(&raw, None);
        assert!(violations.iter().any(|v| v.contains("VERSION file")));
    }
}
