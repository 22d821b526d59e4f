//! Test entrypoint execution.
//!
//! The entrypoint is an executable script path relative to the project root,
//! invoked with no arguments. The hosting environment is exposed through
//! `KILN_ENV` (environment root) and `KILN_ENV_SITE` (site directory) so the
//! script can locate the installed package.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::info;

use kiln_env::Environment;

use crate::error::RunError;

/// Result of running a test entrypoint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScriptOutcome {
    pub script: String,
    pub exit_code: Option<i32>,
    pub success: bool,
}

/// Run `script` (relative to `project_root`) inside `env`.
///
/// The child inherits stdio; a non-zero exit is reported in the outcome, not
/// as an error, so callers control teardown ordering.
pub async fn run_script(
    project_root: &Path,
    script: &str,
    env: &Environment,
) -> Result<ScriptOutcome, RunError> {
    let path = project_root.join(script);
    if !path.is_file() {
        return Err(RunError::EntrypointMissing {
            path: path.display().to_string(),
        });
    }

    info!(script, "running test entrypoint");
    let status = Command::new(&path)
        .current_dir(project_root)
        .env("KILN_ENV", env.root())
        .env("KILN_ENV_SITE", env.site())
        .status()
        .await
        .map_err(|source| RunError::Spawn {
            command: path.display().to_string(),
            source,
        })?;

    Ok(ScriptOutcome {
        script: script.to_string(),
        exit_code: status.code(),
        success: status.success(),
    })
}
