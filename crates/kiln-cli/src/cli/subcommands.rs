use clap::Subcommand;

/// `kiln env` actions.
#[derive(Clone, Debug, Subcommand)]
pub enum EnvCommands {
    /// List environments and what is installed in them.
    List,
    /// Tear down one environment.
    Remove {
        /// Environment label, e.g. `test`.
        label: String,
    },
    /// Tear down all environments.
    Clean,
}

/// `kiln manifest` actions.
#[derive(Clone, Debug, Subcommand)]
pub enum ManifestCommands {
    /// Print the parsed, resolved manifest.
    Show,
    /// Validate the manifest; non-zero exit on any violation.
    Check,
}
