//! # kiln-run
//!
//! Entrypoint execution for Kiln: run a test script inside an ephemeral
//! environment, or supervise an external dev server with mtime-poll
//! auto-reload.

mod error;
mod script;
mod serve;
mod watch;

pub use error::RunError;
pub use script::{ScriptOutcome, run_script};
pub use serve::{ServeOptions, ServeOutcome, serve};
pub use watch::{WatchState, changed, collect_watch_state};
