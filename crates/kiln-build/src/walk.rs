//! Source-set walker for staging.
//!
//! Uses the `ignore` crate for gitignore-aware directory walking with support
//! for a custom ignore file (`.kilnignore`) and the manifest's
//! include/exclude globs. Kiln's own state and output directories are always
//! excluded, whatever the ignore files say.

use std::path::Path;

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;

use kiln_core::KILN_DIR_NAME;

use crate::error::BuildError;

/// Directory names never staged, in addition to the configured
/// build/dist directories.
const ALWAYS_SKIPPED: [&str; 2] = [KILN_DIR_NAME, ".git"];

/// Build a walker over the project source set.
///
/// Respects `.gitignore` and `.kilnignore`; `include`/`exclude` come from the
/// manifest's `[build]` table. `skip_dirs` carries the configured build and
/// dist directory names so a rebuild never stages its own output.
pub fn source_walker(
    root: &Path,
    include: &[String],
    exclude: &[String],
    skip_dirs: &[String],
) -> Result<ignore::Walk, BuildError> {
    let mut builder = WalkBuilder::new(root);

    // Hidden files stay in; ignore files and the filter below do the pruning.
    builder.hidden(false);
    builder.add_custom_ignore_filename(".kilnignore");

    if !include.is_empty() || !exclude.is_empty() {
        let mut overrides = OverrideBuilder::new(root);
        for glob in include {
            overrides
                .add(glob)
                .map_err(|source| BuildError::InvalidGlob {
                    pattern: glob.clone(),
                    source,
                })?;
        }
        for glob in exclude {
            let negated = format!("!{glob}");
            overrides
                .add(&negated)
                .map_err(|source| BuildError::InvalidGlob {
                    pattern: glob.clone(),
                    source,
                })?;
        }
        builder.overrides(overrides.build().map_err(|source| BuildError::InvalidGlob {
            pattern: "<override set>".to_string(),
            source,
        })?);
    }

    let skip: Vec<String> = ALWAYS_SKIPPED
        .iter()
        .map(|s| (*s).to_string())
        .chain(skip_dirs.iter().cloned())
        .collect();
    builder.filter_entry(move |entry| {
        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        if !is_dir {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        !skip.iter().any(|s| s.as_str() == name)
    });

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn walked_names(walk: ignore::Walk) -> Vec<String> {
        let mut names: Vec<String> = walk
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn skips_state_and_output_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("src/app.rs"));
        touch(&dir.path().join(".kiln/envs/test/env.json"));
        touch(&dir.path().join("dist/haru-0.1.0.src.zip"));
        touch(&dir.path().join("build/haru-0.1.0/app.rs"));

        let walk = source_walker(
            dir.path(),
            &[],
            &[],
            &["build".to_string(), "dist".to_string()],
        )
        .unwrap();

        assert_eq!(walked_names(walk), vec!["app.rs".to_string()]);
    }

    #[test]
    fn exclude_globs_are_negated() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("src/app.rs"));
        touch(&dir.path().join("src/app.tmp"));

        let walk = source_walker(dir.path(), &[], &["**/*.tmp".to_string()], &[]).unwrap();
        assert_eq!(walked_names(walk), vec!["app.rs".to_string()]);
    }

    #[test]
    fn invalid_glob_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = source_walker(dir.path(), &["{bad".to_string()], &[], &[]);
        assert!(matches!(result, Err(BuildError::InvalidGlob { .. })));
    }
}
