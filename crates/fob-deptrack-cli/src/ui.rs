//! Status messages on stderr.
//!
//! Command results go to stdout; everything here goes to stderr so output can
//! be piped. `--quiet` suppresses all but [`error`].

use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize;

static QUIET: AtomicBool = AtomicBool::new(false);
static COLOR: AtomicBool = AtomicBool::new(true);

/// Apply the global output flags.
pub fn init(quiet: bool, no_color: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
    COLOR.store(!no_color && crate::logger::should_use_colors(), Ordering::Relaxed);
}

fn quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

fn color() -> bool {
    COLOR.load(Ordering::Relaxed)
}

pub fn success(message: &str) {
    if quiet() {
        return;
    }
    if color() {
        eprintln!("{} {}", "✓".green().bold(), message);
    } else {
        eprintln!("✓ {message}");
    }
}

pub fn info(message: &str) {
    if quiet() {
        return;
    }
    if color() {
        eprintln!("{} {}", "ℹ".blue().bold(), message);
    } else {
        eprintln!("ℹ {message}");
    }
}

pub fn warning(message: &str) {
    if quiet() {
        return;
    }
    if color() {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    } else {
        eprintln!("⚠ {message}");
    }
}

pub fn error(message: &str) {
    if color() {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    } else {
        eprintln!("✗ {message}");
    }
}

/// Render a `label: value` line for summaries, with the label dimmed.
pub fn field(label: &str, value: impl std::fmt::Display) -> String {
    if color() {
        format!("{:>12} {}", label.dimmed(), value)
    } else {
        format!("{label:>12} {value}")
    }
}
