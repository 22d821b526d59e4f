use std::process::ExitCode;

use anyhow::bail;
use serde::Serialize;

use kiln_core::artifact::BuildReport;
use kiln_core::environment::EnvPurpose;
use kiln_run::ScriptOutcome;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output;
use crate::pipeline;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct TestReport {
    name: String,
    version: String,
    build: BuildReport,
    entrypoint: ScriptOutcome,
}

/// Handle `kiln test`: build, fresh environment, editable install, run the
/// test entrypoint, tear down. The entrypoint's exit status is propagated.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let manifest = ctx.manifest()?;
    let entrypoint = resolve_entrypoint(ctx, &manifest)?;

    let spinner = Progress::spinner(&format!("building {}", manifest.name_version()));
    let build = pipeline::run_build(ctx, &manifest)?;
    spinner.set_message("preparing test environment");
    let env = pipeline::prepare_editable_env(ctx, &manifest, EnvPurpose::Test)?;
    spinner.finish_and_clear();

    let outcome = kiln_run::run_script(ctx.project_root(), &entrypoint, &env).await;
    let failed = outcome.as_ref().map_or(true, |o| !o.success);
    pipeline::finish_env(ctx, env, failed)?;
    let outcome = outcome?;

    let code = exit_code_of(&outcome);
    output::output(
        &TestReport {
            name: manifest.name,
            version: manifest.version.to_string(),
            build,
            entrypoint: outcome,
        },
        flags.format,
    )?;
    Ok(code)
}

fn resolve_entrypoint(
    ctx: &AppContext,
    manifest: &kiln_manifest::Manifest,
) -> anyhow::Result<String> {
    if !ctx.config.general.test_entrypoint.is_empty() {
        return Ok(ctx.config.general.test_entrypoint.clone());
    }
    match &manifest.entrypoints.test {
        Some(script) => Ok(script.clone()),
        None => bail!("no test entrypoint: set [entrypoints] test in kiln.toml"),
    }
}

fn exit_code_of(outcome: &ScriptOutcome) -> ExitCode {
    if outcome.success {
        return ExitCode::SUCCESS;
    }
    outcome
        .exit_code
        .and_then(|code| u8::try_from(code).ok())
        .map_or(ExitCode::FAILURE, ExitCode::from)
}
