//! Merge profiles: which files are managed and how each one is merged.
//!
//! A [`MergeProfile`] is plain data handed to the merge engine and the
//! orchestrator.  The built-in [`darktable::profile`] is used unless a TOML
//! profile is supplied on the command line.
pub mod darktable;
pub mod kv;
pub mod policy;
pub mod toml_loader;
pub mod validation;

use std::path::Path;

use serde::Deserialize;

pub use policy::{BackupPolicy, ForcedValue, ManagedFile, MergePolicy};
pub use validation::ValidationWarning;

use crate::error::ConfigError;

/// All managed files of one application's config directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeProfile {
    /// File whose modification time decides the newer platform.
    ///
    /// Defaults to the settings file.
    #[serde(default)]
    pub marker: Option<String>,
    /// Single-valued settings file, rewritten on every run.
    pub settings: ManagedFile,
    /// Files merged only when the two platforms differ.
    #[serde(default)]
    pub keybindings: Vec<ManagedFile>,
    /// Opaque file copied from the primary directory.
    pub data_file: String,
    /// Backup retention for every destination file.
    #[serde(default)]
    pub backup: BackupPolicy,
}

impl MergeProfile {
    /// Load and validate the profile at `path`, or the built-in darktable
    /// profile when `path` is `None`.
    ///
    /// Returns the profile together with its validation warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// profile fails hard validation (see [`validation::validate`]).
    pub fn load(path: Option<&Path>) -> Result<(Self, Vec<ValidationWarning>), ConfigError> {
        let (profile, source): (Self, &Path) = match path {
            Some(path) => (toml_loader::load_toml(path)?, path),
            None => (darktable::profile(), Path::new("<built-in>")),
        };
        let warnings = validation::validate(&profile, source)?;
        Ok((profile, warnings))
    }

    /// File whose modification time decides the newer platform.
    #[must_use]
    pub fn marker_file(&self) -> &str {
        self.marker.as_deref().unwrap_or(&self.settings.name)
    }

    /// Every managed file in processing order: settings first.
    pub fn managed_files(&self) -> impl Iterator<Item = &ManagedFile> {
        std::iter::once(&self.settings).chain(&self.keybindings)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"
data_file = "library.db"

[backup]
keep = 2

[settings]
name = "app.conf"
keep_keys = ["window/.*"]

[settings.forced_keys]
"cache/dir" = { linux = "/var/cache/app", windows = 'C:\cache' }

[[keybindings]]
name = "keys.conf"
allow_duplicates = true
"#;

    #[test]
    fn load_without_path_is_darktable() {
        let (profile, warnings) = MergeProfile::load(None).unwrap();
        assert_eq!(profile, darktable::profile());
        assert!(warnings.is_empty());
    }

    #[test]
    fn load_toml_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        std::fs::write(&path, PROFILE).unwrap();

        let (profile, warnings) = MergeProfile::load(Some(&path)).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(profile.settings.name, "app.conf");
        assert_eq!(profile.marker_file(), "app.conf");
        assert_eq!(profile.backup.keep, 2);
        assert_eq!(profile.backup.suffix, ".bak");
        assert_eq!(profile.keybindings.len(), 1);
        assert_eq!(profile.data_file, "library.db");
    }

    #[test]
    fn load_missing_profile_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MergeProfile::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn load_rejects_invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        std::fs::write(
            &path,
            "data_file = \"d\"\n[settings]\nname = \"s\"\nkeep_keys = [\"(\"]\n",
        )
        .unwrap();
        assert!(matches!(
            MergeProfile::load(Some(&path)),
            Err(ConfigError::InvalidKeyPattern { .. })
        ));
    }

    #[test]
    fn explicit_marker_overrides_settings_name() {
        let mut profile = darktable::profile();
        profile.marker = Some("data.db".to_string());
        assert_eq!(profile.marker_file(), "data.db");
    }

    #[test]
    fn managed_files_start_with_settings() {
        let profile = darktable::profile();
        let names: Vec<&str> = profile.managed_files().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            ["darktablerc", "shortcutsrc", "shortcutsrc.defaults", "shortcutsrc.edit"]
        );
    }
}
