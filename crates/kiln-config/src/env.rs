//! Ephemeral environment configuration.

use serde::{Deserialize, Serialize};

fn default_root() -> String {
    ".kiln/envs".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnvConfig {
    /// Directory environments are created under, relative to the project root.
    #[serde(default = "default_root")]
    pub root: String,

    /// Keep the test/serve environment when the entrypoint fails, for
    /// post-mortem inspection. Defaults to tearing down unconditionally.
    #[serde(default)]
    pub keep_on_failure: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            keep_on_failure: false,
        }
    }
}
