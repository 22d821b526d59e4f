//! Environment store: the directory of ephemeral environments.
//!
//! All environments live under one root (default `.kiln/envs`). Creation is
//! delete-then-recreate, so a label can never inherit stale contents from a
//! previous run.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use kiln_core::environment::{EnvDescriptor, EnvPurpose};

use crate::environment::{DESCRIPTOR_FILE, Environment};
use crate::error::EnvError;

/// Handle to the environments directory of one project.
#[derive(Debug, Clone)]
pub struct EnvStore {
    root: PathBuf,
}

impl EnvStore {
    /// Store rooted at `<project_root>/<env_root>`.
    #[must_use]
    pub fn new(project_root: &Path, env_root: &str) -> Self {
        Self {
            root: project_root.join(env_root),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn env_path(&self, label: &str) -> PathBuf {
        self.root.join(label)
    }

    /// Create a fresh environment. Any prior environment with the same label
    /// is removed first.
    pub fn create(&self, label: &str, purpose: EnvPurpose) -> Result<Environment, EnvError> {
        let env_root = self.env_path(label);
        if env_root.exists() {
            fs::remove_dir_all(&env_root)
                .map_err(|e| EnvError::io(env_root.display().to_string(), e))?;
        }

        let site = env_root.join("site");
        fs::create_dir_all(&site).map_err(|e| EnvError::io(site.display().to_string(), e))?;

        let descriptor = EnvDescriptor {
            label: label.to_string(),
            purpose,
            root: env_root.clone(),
            site,
            created_at: Utc::now(),
            installed: None,
        };

        let env = Environment::new(descriptor);
        env.save()?;
        debug!(label, %purpose, "environment created");
        Ok(env)
    }

    /// Open an existing environment by label.
    pub fn open(&self, label: &str) -> Result<Environment, EnvError> {
        let descriptor_path = self.env_path(label).join(DESCRIPTOR_FILE);
        if !descriptor_path.is_file() {
            return Err(EnvError::NotFound {
                label: label.to_string(),
            });
        }
        let text = fs::read_to_string(&descriptor_path)
            .map_err(|e| EnvError::io(descriptor_path.display().to_string(), e))?;
        let descriptor: EnvDescriptor = serde_json::from_str(&text)?;
        Ok(Environment::new(descriptor))
    }

    /// Descriptors of all environments under the root, sorted by label.
    /// Directories without a readable descriptor are skipped.
    pub fn list(&self) -> Result<Vec<EnvDescriptor>, EnvError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root)
            .map_err(|e| EnvError::io(self.root.display().to_string(), e))?;

        let mut descriptors = Vec::new();
        for entry in entries.filter_map(Result::ok) {
            let label = entry.file_name().to_string_lossy().into_owned();
            if let Ok(env) = self.open(&label) {
                descriptors.push(env.into_descriptor());
            }
        }
        descriptors.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(descriptors)
    }

    /// Tear down one environment by label.
    pub fn remove(&self, label: &str) -> Result<(), EnvError> {
        let env_root = self.env_path(label);
        if !env_root.is_dir() {
            return Err(EnvError::NotFound {
                label: label.to_string(),
            });
        }
        fs::remove_dir_all(&env_root)
            .map_err(|e| EnvError::io(env_root.display().to_string(), e))?;
        debug!(label, "environment removed");
        Ok(())
    }

    /// Tear down every environment. Returns the number removed.
    pub fn clean(&self) -> Result<usize, EnvError> {
        let labels: Vec<String> = self.list()?.into_iter().map(|d| d.label).collect();
        for label in &labels {
            self.remove(label)?;
        }
        // Drop the now-empty root so a cleaned project has no residue.
        if self.root.is_dir() && self.root.read_dir().is_ok_and(|mut d| d.next().is_none()) {
            let _ = fs::remove_dir(&self.root);
        }
        Ok(labels.len())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn store() -> (tempfile::TempDir, EnvStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = EnvStore::new(dir.path(), ".kiln/envs");
        (dir, store)
    }

    #[test]
    fn create_is_delete_then_recreate() {
        let (_dir, store) = store();
        let env = store.create("test", EnvPurpose::Test).unwrap();
        std::fs::write(env.site().join("stale.txt"), b"old").unwrap();

        let env = store.create("test", EnvPurpose::Test).unwrap();
        assert!(!env.site().join("stale.txt").exists());
        assert!(env.site().is_dir());
    }

    #[test]
    fn list_reports_created_environments() {
        let (_dir, store) = store();
        store.create("build", EnvPurpose::Build).unwrap();
        store.create("test", EnvPurpose::Test).unwrap();

        let listed = store.list().unwrap();
        let labels: Vec<&str> = listed.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["build", "test"]);
    }

    #[test]
    fn remove_then_list_is_empty() {
        let (_dir, store) = store();
        store.create("build", EnvPurpose::Build).unwrap();
        store.remove("build").unwrap();

        assert!(store.list().unwrap().is_empty());
        assert!(matches!(
            store.remove("build"),
            Err(EnvError::NotFound { .. })
        ));
    }

    #[test]
    fn clean_removes_everything_including_root() {
        let (dir, store) = store();
        store.create("build", EnvPurpose::Build).unwrap();
        store.create("serve", EnvPurpose::Serve).unwrap();

        assert_eq!(store.clean().unwrap(), 2);
        assert!(!dir.path().join(".kiln/envs").exists());
    }

    #[test]
    fn clean_on_missing_root_is_a_noop() {
        let (_dir, store) = store();
        assert_eq!(store.clean().unwrap(), 0);
    }
}
