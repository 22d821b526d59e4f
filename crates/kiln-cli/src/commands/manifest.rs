use std::process::ExitCode;

use kiln_manifest::Manifest;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ManifestCommands;
use crate::context::AppContext;
use crate::output;

/// Handle `kiln manifest` subcommands.
pub fn handle(
    action: &ManifestCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    match action {
        ManifestCommands::Show => {
            let manifest = ctx.manifest()?;
            output::output(&manifest, flags.format)?;
            Ok(ExitCode::SUCCESS)
        }
        ManifestCommands::Check => {
            let report = Manifest::check(ctx.project_root())?;
            let valid = report.valid;
            output::output(&report, flags.format)?;
            Ok(if valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
