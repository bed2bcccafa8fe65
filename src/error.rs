//! Domain-specific error types for the merge tool.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`], [`WriteError`])
//! while the command layer converts them to [`anyhow::Error`] via the
//! standard `?` operator and attaches the failing task and its managed file.
//!
//! # Error hierarchy
//!
//! ```text
//! MergeToolError
//! ├── Config(ConfigError)    — profile loading, key/value parsing, patterns
//! ├── Write(WriteError)      — safe writes, backups, data file copy
//! ├── Platform(PlatformError)— newest-platform detection
//! └── Usage(UsageError)      — argument combinations clap cannot express
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::platform::Platform;

/// Top-level error type for the merge tool.
#[derive(Error, Debug)]
pub enum MergeToolError {
    /// Configuration-related error (profile, parsing, patterns).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error while persisting a merged file or its backups.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    /// Error while inspecting a platform's config directory.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Invalid combination of command-line arguments.
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),
}

/// Errors that arise from loading profiles and parsing config files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A non-blank line has no `=` separator.
    #[error("malformed line {line} in {}: {content:?} (expected key=value)", file.display())]
    MalformedLine {
        /// File containing the line.
        file: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Raw line content.
        content: String,
    },

    /// A sticky-key pattern is not a valid regular expression.
    #[error("invalid key pattern '{pattern}': {message}")]
    InvalidKeyPattern {
        /// The offending pattern.
        pattern: String,
        /// Parser diagnostic.
        message: String,
    },

    /// A merge profile is structurally invalid.
    #[error("invalid profile {}: {message}", path.display())]
    InvalidProfile {
        /// Profile file, or `<built-in>`.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// An I/O error occurred while reading a config or profile file.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise while writing merged output or copying files.
#[derive(Error, Debug)]
pub enum WriteError {
    /// A filesystem operation on the destination side failed.
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        /// What was being done (e.g. `"create backup"`).
        action: &'static str,
        /// Path involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file to copy does not exist.
    #[error("source file not found: {}", path.display())]
    MissingSource {
        /// Path of the missing source.
        path: PathBuf,
    },

    /// Every backup number up to the maximum is taken.
    #[error("backup numbers exhausted for {}", path.display())]
    BackupsExhausted {
        /// Destination whose chain is full.
        path: PathBuf,
    },
}

/// Errors that arise while comparing the two platforms' directories.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The modification time of the marker file could not be read.
    #[error("cannot read modification time of {platform} marker {}: {source}", path.display())]
    MarkerUnreadable {
        /// Platform whose marker is unreadable.
        platform: Platform,
        /// Marker file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Argument combinations rejected before any file I/O.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UsageError {
    /// Neither `--platform` nor `--destination-platform` was given.
    #[error("either --platform or --destination-platform is required")]
    MissingTargetPlatform,

    /// Neither `--destination-directory` nor `--destination-platform` was given.
    #[error("either --destination-directory or --destination-platform is required")]
    MissingDestination,
}
