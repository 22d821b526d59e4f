//! Build step configuration.

use serde::{Deserialize, Serialize};

fn default_dist_dir() -> String {
    "dist".to_string()
}

fn default_build_dir() -> String {
    "build".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildConfig {
    /// Directory artifacts are written to, relative to the project root.
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,

    /// Staging directory, relative to the project root.
    #[serde(default = "default_build_dir")]
    pub build_dir: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            dist_dir: default_dist_dir(),
            build_dir: default_build_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = BuildConfig::default();
        assert_eq!(config.dist_dir, "dist");
        assert_eq!(config.build_dir, "build");
    }
}
