use std::process::ExitCode;
use std::time::Duration;

use anyhow::bail;
use serde::Serialize;

use kiln_core::environment::EnvPurpose;
use kiln_manifest::AppObject;
use kiln_run::{ServeOptions, ServeOutcome};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output;
use crate::pipeline;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct ServeReport {
    name: String,
    version: String,
    server: ServeOutcome,
}

/// Handle `kiln serve`: build, fresh environment, editable install, then
/// supervise the external server with auto-reload until ctrl-c.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let manifest = ctx.manifest()?;
    let app = resolve_app(ctx, &manifest)?;

    let spinner = Progress::spinner(&format!("building {}", manifest.name_version()));
    pipeline::run_build(ctx, &manifest)?;
    spinner.set_message("preparing serve environment");
    let env = pipeline::prepare_editable_env(ctx, &manifest, EnvPurpose::Serve)?;
    spinner.finish_and_clear();

    let options = ServeOptions {
        command: ctx.config.serve.command.clone(),
        host: ctx.config.serve.host.clone(),
        port: ctx.config.serve.port,
        poll_interval: Duration::from_millis(ctx.config.serve.poll_interval_ms),
        skip_dirs: ctx.skip_dirs(),
    };
    let outcome = kiln_run::serve(ctx.project_root(), &manifest, &app, &env, &options).await;

    let failed = outcome.as_ref().map_or(true, |o| !o.success);
    pipeline::finish_env(ctx, env, failed)?;
    let outcome = outcome?;

    let code = if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    };
    output::output(
        &ServeReport {
            name: manifest.name,
            version: manifest.version.to_string(),
            server: outcome,
        },
        flags.format,
    )?;
    Ok(code)
}

fn resolve_app(ctx: &AppContext, manifest: &kiln_manifest::Manifest) -> anyhow::Result<AppObject> {
    if !ctx.config.general.serve_entrypoint.is_empty() {
        return Ok(ctx.config.general.serve_entrypoint.parse()?);
    }
    match &manifest.entrypoints.serve {
        Some(app) => Ok(app.clone()),
        None => bail!("no serve entrypoint: set [entrypoints] serve in kiln.toml"),
    }
}
