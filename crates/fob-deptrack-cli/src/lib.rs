//! Command-line front end for `fob-deptrack`.
//!
//! Reads a host module graph dump (see [`fob_deptrack::StaticGraph`]), runs a
//! dependency pass over it and reports on the resulting snapshot.
//!
//! - [`cli`] - argument definitions
//! - [`commands`] - `snapshot`, `impact` and `stats`
//! - [`error`] - CLI error type and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status messages on stderr

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;
