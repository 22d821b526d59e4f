//! `module:object` application paths.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An application object path: a module path and an object name, separated by
/// a single colon. The serve entrypoint `tests/asgi:asgi_app` names the
/// `asgi_app` object inside `tests/asgi`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AppObject {
    pub module: String,
    pub object: String,
}

impl AppObject {
    /// Render back to `module:object` form.
    #[must_use]
    pub fn spec(&self) -> String {
        format!("{}:{}", self.module, self.object)
    }
}

impl fmt::Display for AppObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.object)
    }
}

/// Parse error for [`AppObject`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid app object path '{input}': expected 'module:object' with both parts non-empty")]
pub struct AppObjectParseError {
    pub input: String,
}

impl FromStr for AppObject {
    type Err = AppObjectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppObjectParseError {
            input: s.to_string(),
        };

        let (module, object) = s.split_once(':').ok_or_else(invalid)?;
        if module.is_empty() || object.is_empty() || object.contains(':') {
            return Err(invalid());
        }

        Ok(Self {
            module: module.to_string(),
            object: object.to_string(),
        })
    }
}
