use std::process::ExitCode;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Build => commands::build::handle(ctx, flags),
        Commands::Test => commands::test::handle(ctx, flags).await,
        Commands::Serve => commands::serve::handle(ctx, flags).await,
        Commands::Env { action } => commands::env::handle(&action, ctx, flags),
        Commands::Manifest { action } => commands::manifest::handle(&action, ctx, flags),
        Commands::Clean => commands::clean::handle(ctx, flags),
    }
}
