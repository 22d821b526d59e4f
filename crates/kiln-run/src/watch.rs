//! Mtime-poll change detection for the reload loop.
//!
//! The watch set is the same gitignore-aware source set the build stages, so
//! a file that would ship in an artifact is a file that triggers a reload.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use kiln_build::source_walker;
use kiln_manifest::Manifest;

use crate::error::RunError;

/// Snapshot of the watched files and their modification times.
pub type WatchState = BTreeMap<PathBuf, SystemTime>;

/// Collect the current watch state for the project source set.
pub fn collect_watch_state(
    project_root: &Path,
    manifest: &Manifest,
    skip_dirs: &[String],
) -> Result<WatchState, RunError> {
    let walk = source_walker(
        project_root,
        &manifest.build.include,
        &manifest.build.exclude,
        skip_dirs,
    )?;

    let mut state = WatchState::new();
    for entry in walk.filter_map(Result::ok) {
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if let Ok(metadata) = entry.metadata() {
            if let Ok(modified) = metadata.modified() {
                state.insert(entry.path().to_path_buf(), modified);
            }
        }
    }
    Ok(state)
}

/// True when `current` differs from `previous` in any way: a new file, a
/// removed file, or a changed mtime.
#[must_use]
pub fn changed(previous: &WatchState, current: &WatchState) -> bool {
    previous != current
}
