//! General application configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Override for the test entrypoint; empty means use the manifest's.
    #[serde(default)]
    pub test_entrypoint: String,

    /// Override for the serve entrypoint; empty means use the manifest's.
    #[serde(default)]
    pub serve_entrypoint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_empty() {
        let config = GeneralConfig::default();
        assert!(config.test_entrypoint.is_empty());
        assert!(config.serve_entrypoint.is_empty());
    }
}
