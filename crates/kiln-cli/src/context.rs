//! Application context shared by command handlers.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use kiln_config::KilnConfig;
use kiln_core::find_project_root;
use kiln_env::EnvStore;
use kiln_manifest::Manifest;

use crate::cli::GlobalFlags;

pub struct AppContext {
    pub project_root: PathBuf,
    pub config: KilnConfig,
}

impl AppContext {
    /// Resolve the project root (from `--project` or the current directory)
    /// and load layered configuration.
    pub fn init(flags: &GlobalFlags) -> anyhow::Result<Self> {
        let start = match &flags.project {
            Some(project) => PathBuf::from(project),
            None => std::env::current_dir().context("failed to determine current directory")?,
        };
        let project_root = find_project_root(&start)?;
        let config = KilnConfig::load_with_dotenv(&project_root)
            .context("failed to load configuration")?;

        Ok(Self {
            project_root,
            config,
        })
    }

    /// Load and resolve the project manifest. Re-read on every call so a
    /// long-lived serve session picks up edits after restart.
    pub fn manifest(&self) -> anyhow::Result<Manifest> {
        Manifest::load(&self.project_root).context("failed to load kiln.toml")
    }

    /// Store of this project's ephemeral environments.
    #[must_use]
    pub fn env_store(&self) -> EnvStore {
        EnvStore::new(&self.project_root, &self.config.env.root)
    }

    /// Build/dist directory names, excluded from walks and watch sets.
    #[must_use]
    pub fn skip_dirs(&self) -> Vec<String> {
        vec![
            self.config.build.build_dir.clone(),
            self.config.build.dist_dir.clone(),
        ]
    }

    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}
