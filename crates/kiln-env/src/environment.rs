//! One ephemeral environment: site directory, installs, resolution.
//!
//! An environment's `site/` directory holds installed packages. An archive
//! install extracts the payload to `site/<name>/` after verifying every
//! entry against the archive's RECORD. An editable install writes a
//! `site/<name>.link` file containing the absolute project source path, so
//! source edits are live without reinstalling.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::debug;
use zip::ZipArchive;

use kiln_core::environment::{EnvDescriptor, InstallMode, InstalledPackage};

use crate::error::EnvError;
use crate::record::{RECORD_NAME, RecordEntry, parse_record};

/// Descriptor file persisted inside each environment.
pub const DESCRIPTOR_FILE: &str = "env.json";

/// Suffix of editable install link files.
pub const LINK_SUFFIX: &str = ".link";

#[derive(Debug, Clone)]
pub struct Environment {
    descriptor: EnvDescriptor,
}

impl Environment {
    #[must_use]
    pub const fn new(descriptor: EnvDescriptor) -> Self {
        Self { descriptor }
    }

    #[must_use]
    pub fn descriptor(&self) -> &EnvDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn into_descriptor(self) -> EnvDescriptor {
        self.descriptor
    }

    #[must_use]
    pub fn site(&self) -> &Path {
        &self.descriptor.site
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.descriptor.root
    }

    /// Persist the descriptor as `env.json` in the environment root.
    pub fn save(&self) -> Result<(), EnvError> {
        let path = self.descriptor.root.join(DESCRIPTOR_FILE);
        let json = serde_json::to_string_pretty(&self.descriptor)?;
        fs::write(&path, json).map_err(|e| EnvError::io(path.display().to_string(), e))
    }

    /// Install a package in editable mode: a link file pointing at the
    /// project source tree.
    pub fn install_editable(&mut self, name: &str, project_root: &Path) -> Result<(), EnvError> {
        let link = self.site().join(format!("{name}{LINK_SUFFIX}"));
        let target = project_root.display().to_string();
        fs::write(&link, &target).map_err(|e| EnvError::io(link.display().to_string(), e))?;

        self.descriptor.installed = Some(InstalledPackage {
            name: name.to_string(),
            mode: InstallMode::Editable,
            source: project_root.to_path_buf(),
            installed_at: Utc::now(),
        });
        self.save()?;
        debug!(name, target, "editable install");
        Ok(())
    }

    /// Install a built package archive, verifying every payload entry against
    /// the archive's RECORD before anything is written.
    pub fn install_archive(&mut self, name: &str, archive_path: &Path) -> Result<(), EnvError> {
        let file = fs::File::open(archive_path)
            .map_err(|e| EnvError::io(archive_path.display().to_string(), e))?;
        let mut archive = ZipArchive::new(file)?;

        let record = read_record(&mut archive, archive_path)?;
        let entries = verify_entries(&mut archive, &record, archive_path)?;

        for (entry_name, bytes) in entries {
            let dest = safe_site_path(self.site(), &entry_name)?;
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| EnvError::io(parent.display().to_string(), e))?;
            }
            fs::write(&dest, bytes).map_err(|e| EnvError::io(dest.display().to_string(), e))?;
        }

        self.descriptor.installed = Some(InstalledPackage {
            name: name.to_string(),
            mode: InstallMode::Archive,
            source: archive_path.to_path_buf(),
            installed_at: Utc::now(),
        });
        self.save()?;
        debug!(name, archive = %archive_path.display(), "archive install");
        Ok(())
    }

    /// Resolve a package from this environment.
    ///
    /// An installed payload directory wins over an editable link. Returns the
    /// path the package resolves to (payload dir or link target).
    pub fn resolve(&self, name: &str) -> Result<PathBuf, EnvError> {
        let payload = self.site().join(name);
        if payload.is_dir() {
            return Ok(payload);
        }

        let link = self.site().join(format!("{name}{LINK_SUFFIX}"));
        if link.is_file() {
            let target = fs::read_to_string(&link)
                .map_err(|e| EnvError::io(link.display().to_string(), e))?;
            let target = PathBuf::from(target.trim());
            if target.is_dir() {
                return Ok(target);
            }
        }

        Err(EnvError::NotResolvable {
            name: name.to_string(),
            label: self.descriptor.label.clone(),
        })
    }

    /// Remove the environment directory entirely.
    pub fn teardown(self) -> Result<(), EnvError> {
        let root = &self.descriptor.root;
        if root.is_dir() {
            fs::remove_dir_all(root).map_err(|e| EnvError::io(root.display().to_string(), e))?;
        }
        debug!(label = %self.descriptor.label, "environment torn down");
        Ok(())
    }
}

fn read_record<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    archive_path: &Path,
) -> Result<Vec<RecordEntry>, EnvError> {
    let mut text = String::new();
    archive
        .by_name(RECORD_NAME)
        .map_err(|_| EnvError::MissingRecord {
            archive: archive_path.display().to_string(),
        })?
        .read_to_string(&mut text)
        .map_err(|e| EnvError::io(archive_path.display().to_string(), e))?;
    Ok(parse_record(&text))
}

/// Read and hash every hashed RECORD entry. Nothing is written until all
/// entries verify.
fn verify_entries<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    record: &[RecordEntry],
    archive_path: &Path,
) -> Result<Vec<(String, Vec<u8>)>, EnvError> {
    let mut entries = Vec::new();
    for item in record {
        let Some(expected) = &item.sha256 else {
            continue; // RECORD's own line carries no hash
        };

        let mut bytes = Vec::new();
        archive
            .by_name(&item.path)
            .map_err(|_| EnvError::RecordMismatch {
                archive: archive_path.display().to_string(),
                entry: item.path.clone(),
            })?
            .read_to_end(&mut bytes)
            .map_err(|e| EnvError::io(archive_path.display().to_string(), e))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let actual = format!("{:x}", hasher.finalize());
        if &actual != expected {
            return Err(EnvError::RecordMismatch {
                archive: archive_path.display().to_string(),
                entry: item.path.clone(),
            });
        }
        entries.push((item.path.clone(), bytes));
    }
    Ok(entries)
}

/// Join an archive entry name onto the site directory, rejecting absolute
/// paths and parent traversal.
fn safe_site_path(site: &Path, entry_name: &str) -> Result<PathBuf, EnvError> {
    let relative = Path::new(entry_name);
    let unsafe_entry = relative.is_absolute()
        || relative
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir));
    if unsafe_entry {
        return Err(EnvError::UnsafeEntry {
            entry: entry_name.to_string(),
        });
    }
    Ok(site.join(relative))
}
