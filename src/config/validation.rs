//! Consistency checks for merge profiles.
//!
//! Structural problems that would make a run misbehave (zero retention,
//! invalid patterns, empty names) are errors.  Settings that are legal but
//! probably unintended are reported as [`ValidationWarning`]s.
use std::collections::HashSet;
use std::path::Path;

use super::{ManagedFile, MergeProfile};
use crate::error::ConfigError;
use crate::merge::KeyMatcher;

/// A validation warning detected while loading a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The managed file (or profile section) the warning is about.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning for `item`.
    #[must_use]
    pub fn new(item: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Validate `profile`, returning its warnings.
///
/// `source` names the profile in error messages.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidProfile`] for structural problems and
/// [`ConfigError::InvalidKeyPattern`] for patterns that do not compile.
pub fn validate(profile: &MergeProfile, source: &Path) -> Result<Vec<ValidationWarning>, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidProfile {
        path: source.to_path_buf(),
        message,
    };

    if profile.backup.keep == 0 {
        return Err(invalid("backup.keep must be at least 1".to_string()));
    }
    if profile.backup.suffix.is_empty() {
        return Err(invalid("backup.suffix must not be empty".to_string()));
    }
    if profile.backup.suffix.ends_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid(format!(
            "backup.suffix '{}' must not end with a digit",
            profile.backup.suffix
        )));
    }
    if profile.data_file.trim().is_empty() {
        return Err(invalid("data_file must not be empty".to_string()));
    }

    let mut warnings = Vec::new();
    let mut seen = HashSet::new();
    for file in profile.managed_files() {
        if file.name.trim().is_empty() {
            return Err(invalid("managed file names must not be empty".to_string()));
        }
        KeyMatcher::new(&file.policy.keep_keys)?;
        if !seen.insert(file.name.as_str()) {
            warnings.push(ValidationWarning::new(
                &file.name,
                "listed more than once; later entries overwrite earlier output",
            ));
        }
        warnings.extend(policy_warnings(file));
    }

    if seen.contains(profile.data_file.as_str()) {
        warnings.push(ValidationWarning::new(
            &profile.data_file,
            "data file is also a merged file; the copy overwrites the merge",
        ));
    }
    if profile.settings.policy.allow_duplicates {
        warnings.push(ValidationWarning::new(
            &profile.settings.name,
            "settings file allows duplicates; every distinct value is kept",
        ));
    }

    Ok(warnings)
}

fn policy_warnings(file: &ManagedFile) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    if file.policy.allow_duplicates && !file.policy.keep_keys.is_empty() {
        warnings.push(ValidationWarning::new(
            &file.name,
            "keep_keys are ignored when duplicates are allowed",
        ));
    }
    if file.policy.allow_duplicates && !file.policy.forced_keys.is_empty() {
        warnings.push(ValidationWarning::new(
            &file.name,
            "forced keys replace every merged value of their key",
        ));
    }
    warnings
}
