//! Merge policy data: how each managed file is reconciled.
use std::collections::BTreeMap;

use serde::Deserialize;

use crate::platform::{Platform, PlatformMap};

/// Value written for a forced key after merging.
///
/// Deserializes from either a plain string or a `{ linux, windows }` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ForcedValue {
    /// Same value on every platform.
    Literal(String),
    /// A platform-specific value, typically a path.
    PerPlatform(PlatformMap<String>),
}

impl ForcedValue {
    /// The value to write when merging for `platform`.
    #[must_use]
    pub fn resolve(&self, platform: Platform) -> &str {
        match self {
            Self::Literal(value) => value,
            Self::PerPlatform(values) => values.get(platform),
        }
    }
}

impl From<&str> for ForcedValue {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

/// How one managed file is merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MergePolicy {
    /// Keep every distinct value of a key instead of picking one.
    pub allow_duplicates: bool,
    /// Sticky-key patterns: matching keys always take the secondary value.
    ///
    /// Ignored when `allow_duplicates` is set.
    pub keep_keys: Vec<String>,
    /// Keys overwritten after the merge regardless of either input.
    pub forced_keys: BTreeMap<String, ForcedValue>,
}

impl MergePolicy {
    /// Policy for append-only files such as keybindings.
    #[must_use]
    pub fn duplicates_allowed() -> Self {
        Self {
            allow_duplicates: true,
            ..Self::default()
        }
    }
}

/// A file name inside each config directory plus its merge policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManagedFile {
    /// File name relative to a config directory.
    pub name: String,
    /// How the file is merged.
    #[serde(flatten)]
    pub policy: MergePolicy,
}

impl ManagedFile {
    /// Create a managed file entry.
    pub fn new(name: impl Into<String>, policy: MergePolicy) -> Self {
        Self {
            name: name.into(),
            policy,
        }
    }
}

/// Default number of numbered backups kept per destination.
pub const DEFAULT_KEEP_COUNT: usize = 4;

/// Default backup suffix; the backup number is appended to it.
pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

/// Retention rules for the numbered backup chain of a destination file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackupPolicy {
    /// Number of most recent backups retained.
    pub keep: usize,
    /// Literal inserted between the file name and the backup number.
    pub suffix: String,
}

impl Default for BackupPolicy {
    fn default() -> Self {
        Self {
            keep: DEFAULT_KEEP_COUNT,
            suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}
