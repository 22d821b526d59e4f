//! # kiln-config
//!
//! Layered configuration loading for Kiln using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`KILN_*` prefix, `__` as separator)
//! 2. Project-level `.kiln/config.toml`
//! 3. User-level `~/.config/kiln/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `KILN_SERVE__PORT` -> `serve.port`, `KILN_BUILD__DIST_DIR` ->
//! `build.dist_dir`, etc. The `__` (double underscore) separates nested
//! config sections.
//!
//! # Usage
//!
//! ```no_run
//! use kiln_config::KilnConfig;
//!
//! let config = KilnConfig::load().expect("config");
//! println!("dist dir: {}", config.build.dist_dir);
//! ```

mod build;
mod env;
mod error;
mod general;
mod serve;

pub use build::BuildConfig;
pub use env::EnvConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use serve::ServeConfig;

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KilnConfig {
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub env: EnvConfig,
    #[serde(default)]
    pub serve: ServeConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl KilnConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading. Relative `.kiln/config.toml` is resolved against
    /// the current directory; prefer [`Self::load_for_project`] when the
    /// project root is known.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment(None).extract().map_err(ConfigError::from)
    }

    /// Load configuration for a known project root.
    ///
    /// The project-local layer is read from `<root>/.kiln/config.toml`
    /// instead of the current directory.
    pub fn load_for_project(project_root: &Path) -> Result<Self, ConfigError> {
        Self::figment(Some(project_root))
            .extract()
            .map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` for the project root's `.env` before building the
    /// figment. This is the typical entry point for the CLI.
    pub fn load_with_dotenv(project_root: &Path) -> Result<Self, ConfigError> {
        let env_path = project_root.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        }
        Self::load_for_project(project_root)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add additional
    /// providers on top.
    #[must_use]
    pub fn figment(project_root: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_root.map_or_else(
            || PathBuf::from(".kiln/config.toml"),
            |root| root.join(".kiln").join("config.toml"),
        );
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("KILN_").split("__"));

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kiln").join("config.toml"))
    }
}
