use std::process::ExitCode;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output;
use crate::pipeline;
use crate::progress::Progress;

/// Handle `kiln build`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let manifest = ctx.manifest()?;

    let spinner = Progress::spinner(&format!("building {}", manifest.name_version()));
    let report = pipeline::run_build(ctx, &manifest)?;
    spinner.finish_and_clear();

    output::output(&report, flags.format)?;
    Ok(ExitCode::SUCCESS)
}
