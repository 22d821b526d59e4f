//! Dev server supervision with auto-reload.
//!
//! The server itself is an external command; Kiln spawns it against the
//! manifest's app object, polls the source set for changes, and restarts the
//! child on change. Ctrl-C terminates the child and returns so the caller
//! can tear the environment down.

use std::path::Path;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::process::{Child, Command};
use tokio::signal;
use tokio::time::sleep;
use tracing::{info, warn};

use kiln_env::Environment;
use kiln_manifest::{AppObject, Manifest};

use crate::error::RunError;
use crate::watch::{changed, collect_watch_state};

/// How the dev server is launched and watched.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub command: String,
    pub host: String,
    pub port: u16,
    pub poll_interval: Duration,
    /// Build/dist directory names excluded from the watch set.
    pub skip_dirs: Vec<String>,
}

/// Result of a completed serve session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ServeOutcome {
    pub app: String,
    pub restarts: u32,
    /// Exit code when the server exited on its own; None after ctrl-c.
    pub exit_code: Option<i32>,
    pub success: bool,
}

enum Supervision {
    SourceChanged,
    Shutdown,
    Exited(Option<i32>, bool),
}

/// Serve `app` until ctrl-c or the server exits on its own.
pub async fn serve(
    project_root: &Path,
    manifest: &Manifest,
    app: &AppObject,
    env: &Environment,
    options: &ServeOptions,
) -> Result<ServeOutcome, RunError> {
    let mut restarts = 0u32;
    let mut state = collect_watch_state(project_root, manifest, &options.skip_dirs)?;

    loop {
        let mut child = spawn_server(project_root, app, env, options)?;
        info!(app = %app, command = %options.command, restarts, "dev server started");

        match supervise(&mut child, project_root, manifest, options, &mut state).await? {
            Supervision::SourceChanged => {
                warn!(app = %app, "source changed; restarting dev server");
                terminate(&mut child).await;
                restarts += 1;
            }
            Supervision::Shutdown => {
                info!("shutdown signal received; stopping dev server");
                terminate(&mut child).await;
                return Ok(ServeOutcome {
                    app: app.spec(),
                    restarts,
                    exit_code: None,
                    success: true,
                });
            }
            Supervision::Exited(exit_code, success) => {
                return Ok(ServeOutcome {
                    app: app.spec(),
                    restarts,
                    exit_code,
                    success,
                });
            }
        }
    }
}

fn spawn_server(
    project_root: &Path,
    app: &AppObject,
    env: &Environment,
    options: &ServeOptions,
) -> Result<Child, RunError> {
    Command::new(&options.command)
        .arg(app.spec())
        .arg("--host")
        .arg(&options.host)
        .arg("--port")
        .arg(options.port.to_string())
        .current_dir(project_root)
        .env("KILN_ENV", env.root())
        .env("KILN_ENV_SITE", env.site())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| RunError::Spawn {
            command: options.command.clone(),
            source,
        })
}

async fn supervise(
    child: &mut Child,
    project_root: &Path,
    manifest: &Manifest,
    options: &ServeOptions,
    state: &mut crate::watch::WatchState,
) -> Result<Supervision, RunError> {
    loop {
        tokio::select! {
            status = child.wait() => {
                let status = status?;
                return Ok(Supervision::Exited(status.code(), status.success()));
            }
            _ = signal::ctrl_c() => {
                return Ok(Supervision::Shutdown);
            }
            () = sleep(options.poll_interval) => {
                let current = collect_watch_state(project_root, manifest, &options.skip_dirs)?;
                if changed(state, &current) {
                    *state = current;
                    return Ok(Supervision::SourceChanged);
                }
            }
        }
    }
}

/// Best-effort child termination; the `kill_on_drop` guard backs this up.
async fn terminate(child: &mut Child) {
    if let Err(error) = child.kill().await {
        warn!(%error, "failed to kill dev server child");
    }
}
