use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod context;
mod output;
mod pipeline;
mod progress;
mod ui;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("kiln error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    load_dotenv(cli.project.as_deref());
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    let mut ctx = context::AppContext::init(&flags)?;
    commands::dispatch::dispatch(cli.command, &mut ctx, &flags).await
}

/// Bring the project `.env` into the process before the `KILN_LOG` filter is
/// installed, so a filter set there takes effect.
///
/// Returns the path that was loaded, if any. Failures are silent; the
/// project root is resolved again (with diagnostics) in `AppContext::init`.
fn load_dotenv(project: Option<&str>) -> Option<std::path::PathBuf> {
    let start = match project {
        Some(project) => std::path::PathBuf::from(project),
        None => std::env::current_dir().ok()?,
    };
    let env_path = kiln_core::find_project_root(&start).ok()?.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
        return Some(env_path);
    }
    None
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("KILN_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
