//! Project root discovery.
//!
//! A Kiln project is any directory containing a `kiln.toml`. Discovery walks
//! up from a start directory, matching how the CLI resolves `--project`.

use std::path::{Path, PathBuf};

use crate::errors::CoreError;

/// Manifest file that marks a project root.
pub const MANIFEST_FILE_NAME: &str = "kiln.toml";

/// Version file consulted when the manifest declares a dynamic version.
pub const VERSION_FILE_NAME: &str = "VERSION";

/// Directory holding Kiln state inside a project (config, environments).
pub const KILN_DIR_NAME: &str = ".kiln";

/// Walk up from `start` looking for a directory containing `kiln.toml`.
///
/// Returns the project root, or [`CoreError::ProjectNotFound`] when no
/// ancestor carries a manifest.
pub fn find_project_root(start: &Path) -> Result<PathBuf, CoreError> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(MANIFEST_FILE_NAME).is_file() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(CoreError::ProjectNotFound {
                start: start.display().to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_manifest_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE_NAME), "[project]\n").unwrap();
        let nested = dir.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        let root = find_project_root(&nested).unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn errors_when_no_manifest_exists() {
        let dir = tempfile::tempdir().unwrap();
        let result = find_project_root(dir.path());
        assert!(matches!(result, Err(CoreError::ProjectNotFound { .. })));
    }
}
