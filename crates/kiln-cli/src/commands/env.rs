use std::process::ExitCode;

use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::EnvCommands;
use crate::context::AppContext;
use crate::output;

#[derive(Debug, Serialize)]
struct EnvRow {
    label: String,
    purpose: String,
    created_at: String,
    installed: String,
}

#[derive(Debug, Serialize)]
struct EnvRemovalReport {
    removed: usize,
}

/// Handle `kiln env` subcommands.
pub fn handle(
    action: &EnvCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    let store = ctx.env_store();
    match action {
        EnvCommands::List => {
            let rows: Vec<EnvRow> = store
                .list()?
                .into_iter()
                .map(|d| EnvRow {
                    label: d.label,
                    purpose: d.purpose.to_string(),
                    created_at: d.created_at.to_rfc3339(),
                    installed: d.installed.map_or_else(
                        || "-".to_string(),
                        |pkg| format!("{} ({})", pkg.name, pkg.mode),
                    ),
                })
                .collect();
            output::output(&rows, flags.format)?;
        }
        EnvCommands::Remove { label } => {
            store.remove(label)?;
            output::output(&EnvRemovalReport { removed: 1 }, flags.format)?;
        }
        EnvCommands::Clean => {
            let removed = store.clean()?;
            output::output(&EnvRemovalReport { removed }, flags.format)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
