use clap::Subcommand;

use crate::cli::subcommands::{EnvCommands, ManifestCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Build distribution artifacts into dist/.
    Build,
    /// Build, install editable into a fresh environment, run the test
    /// entrypoint, tear down.
    Test,
    /// Build, install editable, serve the app object with auto-reload.
    Serve,
    /// Ephemeral environment management.
    Env {
        #[command(subcommand)]
        action: EnvCommands,
    },
    /// Project manifest inspection.
    Manifest {
        #[command(subcommand)]
        action: ManifestCommands,
    },
    /// Remove build/, dist/, and all environments.
    Clean,
}
