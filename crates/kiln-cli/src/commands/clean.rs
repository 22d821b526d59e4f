use std::fs;
use std::process::ExitCode;

use anyhow::Context as _;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output;

#[derive(Debug, Serialize)]
struct CleanReport {
    removed_dirs: Vec<String>,
    removed_environments: usize,
}

/// Handle `kiln clean`: remove build/, dist/, and all environments.
/// Safe when nothing exists.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let mut removed_dirs = Vec::new();
    for name in [&ctx.config.build.build_dir, &ctx.config.build.dist_dir] {
        let dir = ctx.project_root().join(name);
        if dir.is_dir() {
            fs::remove_dir_all(&dir)
                .with_context(|| format!("failed to remove {}", dir.display()))?;
            removed_dirs.push(name.clone());
        }
    }

    let removed_environments = ctx.env_store().clean()?;

    output::output(
        &CleanReport {
            removed_dirs,
            removed_environments,
        },
        flags.format,
    )?;
    Ok(ExitCode::SUCCESS)
}
