//! The two platforms whose config directories are reconciled.
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// One of the two installations under management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum Platform {
    /// The Linux installation.
    Linux,
    /// The Windows installation.
    Windows,
}

impl Platform {
    /// Every platform, in declaration order.
    pub const ALL: [Self; 2] = [Self::Linux, Self::Windows];
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// One value per [`Platform`].
///
/// Lookups are exhaustive matches, so adding a platform forces every table
/// (forced keys, config directories) to supply a value for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformMap<T> {
    /// Value used for [`Platform::Linux`].
    pub linux: T,
    /// Value used for [`Platform::Windows`].
    pub windows: T,
}

impl<T> PlatformMap<T> {
    /// Build a map from the Linux and Windows values.
    pub const fn new(linux: T, windows: T) -> Self {
        Self { linux, windows }
    }

    /// Value for `platform`.
    pub const fn get(&self, platform: Platform) -> &T {
        match platform {
            Platform::Linux => &self.linux,
            Platform::Windows => &self.windows,
        }
    }
}

/// The config directory of each platform.
pub type ConfigDirs = PlatformMap<PathBuf>;

impl ConfigDirs {
    /// Path of `file_name` inside `platform`'s config directory.
    #[must_use]
    pub fn file(&self, platform: Platform, file_name: &str) -> PathBuf {
        self.dir(platform).join(file_name)
    }

    /// Config directory of `platform`.
    #[must_use]
    pub fn dir(&self, platform: Platform) -> &Path {
        self.get(platform)
    }
}
