//! Dev server configuration.
//!
//! The server itself is an external tool; Kiln only spawns and supervises it.

use serde::{Deserialize, Serialize};

fn default_command() -> String {
    "uvicorn".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_poll_interval_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServeConfig {
    /// Server executable invoked as `<command> <module>:<object>`.
    #[serde(default = "default_command")]
    pub command: String,

    /// Bind host passed as `--host`.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port passed as `--port`.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Mtime poll interval for the reload watcher, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            host: default_host(),
            port: default_port(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ServeConfig::default();
        assert_eq!(config.command, "uvicorn");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.poll_interval_ms, 500);
    }
}
