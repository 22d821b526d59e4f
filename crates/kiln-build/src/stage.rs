//! Source staging.
//!
//! The staging step copies the walked source set into
//! `build/<name>-<version>/`, preserving relative paths. The manifest (and
//! the `VERSION` file, when the version is dynamic) are always staged even if
//! an include set would filter them out.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use kiln_core::{MANIFEST_FILE_NAME, VERSION_FILE_NAME};
use kiln_manifest::Manifest;

use crate::error::BuildError;
use crate::walk::source_walker;

/// Stage the project source set into `stage_dir` (delete-then-recreate).
///
/// Returns the staged relative paths, sorted, for deterministic archive
/// ordering.
pub fn stage_sources(
    project_root: &Path,
    stage_dir: &Path,
    manifest: &Manifest,
    skip_dirs: &[String],
) -> Result<Vec<PathBuf>, BuildError> {
    if stage_dir.exists() {
        fs::remove_dir_all(stage_dir)
            .map_err(|e| BuildError::io(stage_dir.display().to_string(), e))?;
    }
    fs::create_dir_all(stage_dir).map_err(|e| BuildError::io(stage_dir.display().to_string(), e))?;

    let mut staged = Vec::new();
    let walk = source_walker(
        project_root,
        &manifest.build.include,
        &manifest.build.exclude,
        skip_dirs,
    )?;

    for entry in walk {
        let entry = entry?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(project_root)
            .map_err(|_| BuildError::OutsideRoot {
                path: entry.path().display().to_string(),
            })?
            .to_path_buf();
        copy_into(project_root, stage_dir, &relative)?;
        staged.push(relative);
    }

    // The manifest always ships; same for VERSION when the version is dynamic.
    let mut required = vec![PathBuf::from(MANIFEST_FILE_NAME)];
    if manifest.version_is_dynamic {
        required.push(PathBuf::from(VERSION_FILE_NAME));
    }
    for relative in required {
        if !staged.contains(&relative) && project_root.join(&relative).is_file() {
            copy_into(project_root, stage_dir, &relative)?;
            staged.push(relative);
        }
    }

    staged.sort();
    debug!(files = staged.len(), stage = %stage_dir.display(), "staged source set");
    Ok(staged)
}

fn copy_into(project_root: &Path, stage_dir: &Path, relative: &Path) -> Result<(), BuildError> {
    let source = project_root.join(relative);
    let dest = stage_dir.join(relative);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::io(parent.display().to_string(), e))?;
    }
    fs::copy(&source, &dest).map_err(|e| BuildError::io(source.display().to_string(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn manifest_in(dir: &Path, body: &str) -> Manifest {
        fs::write(dir.join(MANIFEST_FILE_NAME), body).unwrap();
        Manifest::load(dir).unwrap()
    }

    #[test]
    fn stages_sources_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest_in(dir.path(), "[project]\nname = \"haru\"\nversion = \"0.1.0\"\n");
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/app.rs"), b"fn main() {}").unwrap();

        let stage = dir.path().join("build").join("haru-0.1.0");
        let staged = stage_sources(dir.path(), &stage, &manifest, &["build".to_string()]).unwrap();

        assert!(staged.contains(&PathBuf::from("src/app.rs")));
        assert!(staged.contains(&PathBuf::from(MANIFEST_FILE_NAME)));
        assert!(stage.join("src/app.rs").is_file());
    }

    #[test]
    fn restaging_replaces_prior_contents() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest_in(dir.path(), "[project]\nname = \"haru\"\nversion = \"0.1.0\"\n");
        let stage = dir.path().join("build").join("haru-0.1.0");

        fs::create_dir_all(&stage).unwrap();
        fs::write(stage.join("stale.txt"), b"old").unwrap();

        let staged = stage_sources(dir.path(), &stage, &manifest, &["build".to_string()]).unwrap();
        assert!(!stage.join("stale.txt").exists());
        assert_eq!(staged, vec![PathBuf::from(MANIFEST_FILE_NAME)]);
    }
}
