//! # kiln-build
//!
//! The packaging step: stage the project source set and produce exactly two
//! distribution artifacts under `dist/` — a source archive and a built
//! package archive with an integrity RECORD.
//!
//! Prior `build/` and `dist/` directories are removed first, so re-running a
//! build after success produces an identical result.

mod archive;
mod error;
mod stage;
mod walk;

pub use archive::{METADATA_NAME, RECORD_NAME, render_metadata, sha256_file, sha256_hex};
pub use error::BuildError;
pub use stage::stage_sources;
pub use walk::source_walker;

use std::fs;
use std::path::Path;

use chrono::Utc;
use tracing::info;

use kiln_core::artifact::{ArtifactDescriptor, ArtifactKind, BuildReport, artifact_file_name};
use kiln_manifest::Manifest;

/// Directory names for the build, relative to the project root.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub build_dir: String,
    pub dist_dir: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            build_dir: "build".to_string(),
            dist_dir: "dist".to_string(),
        }
    }
}

/// Run the packaging step for `project_root`.
///
/// Removes prior `build/` and `dist/` directories, stages the source set,
/// and writes one `.src.zip` and one `.pkg.zip` into `dist/`.
pub fn build_project(
    project_root: &Path,
    manifest: &Manifest,
    options: &BuildOptions,
) -> Result<BuildReport, BuildError> {
    let build_dir = project_root.join(&options.build_dir);
    let dist_dir = project_root.join(&options.dist_dir);

    for dir in [&build_dir, &dist_dir] {
        if dir.exists() {
            fs::remove_dir_all(dir).map_err(|e| BuildError::io(dir.display().to_string(), e))?;
        }
    }
    fs::create_dir_all(&dist_dir)
        .map_err(|e| BuildError::io(dist_dir.display().to_string(), e))?;

    let stage_dir = build_dir.join(manifest.name_version());
    let skip_dirs = vec![options.build_dir.clone(), options.dist_dir.clone()];
    let staged = stage_sources(project_root, &stage_dir, manifest, &skip_dirs)?;

    let mut artifacts = Vec::with_capacity(2);
    for kind in [ArtifactKind::Src, ArtifactKind::Pkg] {
        let file_name = artifact_file_name(&manifest.name, &manifest.version.to_string(), kind);
        let dest = dist_dir.join(&file_name);
        match kind {
            ArtifactKind::Src => archive::write_src_archive(&stage_dir, &staged, manifest, &dest)?,
            ArtifactKind::Pkg => archive::write_pkg_archive(&stage_dir, &staged, manifest, &dest)?,
        }

        let size_bytes = fs::metadata(&dest)
            .map_err(|e| BuildError::io(dest.display().to_string(), e))?
            .len();
        artifacts.push(ArtifactDescriptor {
            kind,
            file_name,
            sha256: sha256_file(&dest)?,
            path: dest,
            size_bytes,
        });
    }

    info!(
        name = %manifest.name,
        version = %manifest.version,
        files = staged.len(),
        "build complete"
    );

    Ok(BuildReport {
        name: manifest.name.clone(),
        version: manifest.version.to_string(),
        dist_dir,
        artifacts,
        staged_files: staged.len() as u64,
        built_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn project() -> (tempfile::TempDir, Manifest) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("kiln.toml"),
            "[project]\nname = \"haru\"\nversion = \"0.1.0\"\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/app.rs"), b"fn main() {}").unwrap();
        let manifest = Manifest::load(dir.path()).unwrap();
        (dir, manifest)
    }

    #[test]
    fn build_produces_exactly_two_artifacts() {
        let (dir, manifest) = project();
        let report = build_project(dir.path(), &manifest, &BuildOptions::default()).unwrap();

        assert_eq!(report.artifacts.len(), 2);
        let dist_entries: Vec<_> = fs::read_dir(dir.path().join("dist"))
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(dist_entries.len(), 2);
        assert!(dist_entries.contains(&"haru-0.1.0.src.zip".to_string()));
        assert!(dist_entries.contains(&"haru-0.1.0.pkg.zip".to_string()));
        assert!(report.artifact(ArtifactKind::Pkg).is_some());
    }

    #[test]
    fn rebuild_after_success_is_idempotent() {
        let (dir, manifest) = project();
        let options = BuildOptions::default();
        let first = build_project(dir.path(), &manifest, &options).unwrap();
        let second = build_project(dir.path(), &manifest, &options).unwrap();

        assert_eq!(first.artifacts.len(), second.artifacts.len());
        // Prior dist contents were removed, not accumulated.
        let dist_entries = fs::read_dir(dir.path().join("dist")).unwrap().count();
        assert_eq!(dist_entries, 2);
    }

    #[test]
    fn stale_dist_artifacts_are_removed() {
        let (dir, manifest) = project();
        fs::create_dir_all(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("dist/haru-0.0.9.src.zip"), b"stale").unwrap();

        build_project(dir.path(), &manifest, &BuildOptions::default()).unwrap();
        assert!(!dir.path().join("dist/haru-0.0.9.src.zip").exists());
    }
}
