//! Darktable config directory merger.
//!
//! Reconciles the config directories of a Linux and a Windows installation
//! of darktable into one destination directory: the settings file is merged
//! with "primary wins" precedence plus sticky and forced keys, keybinding
//! files are merged as value unions, and the library database is copied
//! from the primary side.  Every replaced file is kept in a numbered backup
//! chain.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: merge profiles (the policy tables) and the `key=value` parser
//! - **[`merge`]**: the pure merge engine
//! - **[`resources`]**: backup chains and backup-preserving writes
//! - **[`newest`]**: newest-platform detection from marker timestamps
//! - **[`tasks`]**: the ordered units of one merge run
//! - **[`commands`]**: argument resolution and task execution
//!
//! Runs take no locks: two runs writing into the same destination directory
//! at the same time can interleave their backup numbering, so callers must
//! not overlap them.
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod merge;
pub mod newest;
pub mod platform;
pub mod resources;
pub mod tasks;

/// Build identifier: `DTMERGE_VERSION` at build time, else the package
/// version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("DTMERGE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}
