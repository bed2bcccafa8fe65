//! Command-line arguments.
use std::fmt;
use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};

use crate::error::UsageError;
use crate::platform::{ConfigDirs, Platform};

/// Merge the darktable config directories of a Linux and a Windows
/// installation.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dtmerge",
    about = "Merge two darktable config directories from a Windows and a Linux installation",
    version = crate::version(),
    after_help = "Runs against the same destination directory must not overlap."
)]
#[command(group(
    ArgGroup::new("destination")
        .required(true)
        .args(["destination_directory", "destination_platform"])
))]
pub struct Cli {
    /// Which config to prefer when merging
    #[arg(short, long, value_enum)]
    pub merge: MergeOption,

    /// Platform for which the merge is made [default: the destination platform]
    #[arg(short, long, value_enum)]
    pub platform: Option<Platform>,

    /// Directory where merged files are written
    #[arg(short = 'D', long, value_name = "DIR")]
    pub destination_directory: Option<PathBuf>,

    /// Platform into whose config directory merged files are written
    #[arg(short = 'd', long, value_enum)]
    pub destination_platform: Option<Platform>,

    /// Path to the Linux config directory
    #[arg(short, long, value_name = "DIR")]
    pub linux_config: PathBuf,

    /// Path to the Windows config directory
    #[arg(short, long, value_name = "DIR")]
    pub windows_config: PathBuf,

    /// Preview changes without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Hours the Linux clock runs ahead of the Windows clock, used by `--merge newest`
    #[arg(
        short = 't',
        long,
        value_name = "HOURS",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub system_clock_delta: i64,

    /// Enable verbose output
    #[arg(short, long, visible_alias = "debug")]
    pub verbose: bool,

    /// Merge profile (TOML) used instead of the built-in darktable profile
    #[arg(long, value_name = "FILE")]
    pub profile: Option<PathBuf>,
}

/// Precedence selector for `--merge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MergeOption {
    /// Prefer whichever config directory was modified last
    #[value(alias = "auto")]
    Newest,
    /// Prefer the Linux config
    Linux,
    /// Prefer the Windows config
    Windows,
}

impl MergeOption {
    /// The explicitly named platform, or `None` for [`MergeOption::Newest`].
    #[must_use]
    pub const fn platform(self) -> Option<Platform> {
        match self {
            Self::Newest => None,
            Self::Linux => Some(Platform::Linux),
            Self::Windows => Some(Platform::Windows),
        }
    }
}

impl fmt::Display for MergeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.platform() {
            Some(platform) => fmt::Display::fmt(&platform, f),
            None => f.write_str("newest"),
        }
    }
}

impl Cli {
    /// Platform the merge is made for: `--platform`, else
    /// `--destination-platform`.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::MissingTargetPlatform`] if neither is given.
    pub fn target_platform(&self) -> Result<Platform, UsageError> {
        self.platform
            .or(self.destination_platform)
            .ok_or(UsageError::MissingTargetPlatform)
    }

    /// Both platforms' config directories.
    #[must_use]
    pub fn config_dirs(&self) -> ConfigDirs {
        ConfigDirs::new(self.linux_config.clone(), self.windows_config.clone())
    }

    /// Directory receiving the merged files.
    ///
    /// `--destination-platform` selects that platform's config directory.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::MissingDestination`] if no destination is given.
    pub fn destination(&self) -> Result<PathBuf, UsageError> {
        match (self.destination_platform, &self.destination_directory) {
            (Some(platform), _) => Ok(self.config_dirs().dir(platform).to_path_buf()),
            (None, Some(dir)) => Ok(dir.clone()),
            (None, None) => Err(UsageError::MissingDestination),
        }
    }

    /// Resolved arguments as `(name, value)` pairs, for logging.
    #[must_use]
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        fn opt<T: fmt::Display>(value: Option<T>) -> String {
            value.map_or_else(|| "-".to_string(), |v| v.to_string())
        }
        vec![
            ("merge", self.merge.to_string()),
            ("platform", opt(self.platform)),
            (
                "destination_directory",
                opt(self.destination_directory.as_ref().map(|p| p.display())),
            ),
            ("destination_platform", opt(self.destination_platform)),
            ("linux_config", self.linux_config.display().to_string()),
            ("windows_config", self.windows_config.display().to_string()),
            ("dry_run", self.dry_run.to_string()),
            ("system_clock_delta", self.system_clock_delta.to_string()),
            ("verbose", self.verbose.to_string()),
            ("profile", opt(self.profile.as_ref().map(|p| p.display()))),
        ]
    }
}
