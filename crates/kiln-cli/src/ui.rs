//! Terminal presentation preferences.
//!
//! Resolved once at startup from the global flags plus the terminal
//! environment; everything stays off until [`init`] runs, so rendering code
//! degrades to plain output in tests and pipes.

use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};

/// Narrowest `COLUMNS` value worth constraining a table to.
const MIN_TABLE_WIDTH: usize = 40;

#[derive(Clone, Copy, Debug, Default)]
pub struct UiPrefs {
    pub color: bool,
    pub progress: bool,
    pub width: Option<usize>,
}

static PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let tty = std::io::stdout().is_terminal();
    let _ = PREFS.set(UiPrefs {
        color: color_enabled(flags, tty),
        progress: progress_enabled(flags, tty),
        width: std::env::var("COLUMNS")
            .ok()
            .and_then(|raw| usable_width(&raw)),
    });
}

#[must_use]
pub fn prefs() -> UiPrefs {
    PREFS.get().copied().unwrap_or_default()
}

/// Tables are the only colored surface; json and raw stay machine-readable.
fn color_enabled(flags: &GlobalFlags, tty: bool) -> bool {
    if flags.format != OutputFormat::Table {
        return false;
    }
    match flags.color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => tty && !flags.quiet && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Spinners never mix with json output; `on` forces them even without a tty.
fn progress_enabled(flags: &GlobalFlags, tty: bool) -> bool {
    if flags.format == OutputFormat::Json {
        return false;
    }
    match flags.progress {
        ProgressMode::On => true,
        ProgressMode::Off => false,
        ProgressMode::Auto => tty && !flags.quiet,
    }
}

fn usable_width(raw: &str) -> Option<usize> {
    match raw.trim().parse::<usize>() {
        Ok(width) if width >= MIN_TABLE_WIDTH => Some(width),
        _ => None,
    }
}
