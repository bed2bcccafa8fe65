//! Numbered backup chains.
//!
//! Backups of a destination `P` are siblings named `P<suffix><N>` (for
//! example `darktablerc.bak3`).  Numbers only grow: the next backup takes the
//! first free number at or above the highest existing one, and everything
//! older than the newest `keep` backups is pruned.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::WriteError;

/// The backup chain of one destination file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupChain {
    dest: PathBuf,
    suffix: String,
}

/// What a rotation will do before the destination is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    /// Number of the backup that receives the current destination content.
    pub number: u64,
    /// Path of that backup.
    pub path: PathBuf,
    /// Existing backups falling out of the retention window, oldest first.
    pub prune: Vec<PathBuf>,
}

impl BackupChain {
    /// Chain for `dest` using `suffix` between the file name and the number.
    pub fn new(dest: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            dest: dest.into(),
            suffix: suffix.into(),
        }
    }

    /// Path of backup `number`.
    #[must_use]
    pub fn path(&self, number: u64) -> PathBuf {
        let mut name = self.prefix();
        name.push(number.to_string());
        self.dest.with_file_name(name)
    }

    /// Numbers of every existing backup, ascending.
    ///
    /// Siblings whose name continues past the suffix with anything other
    /// than ASCII digits are not part of the chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination directory exists but cannot be
    /// listed.
    pub fn scan(&self) -> Result<Vec<u64>, WriteError> {
        let dir = self
            .dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(WriteError::Io {
                    action: "list backups in",
                    path: dir.to_path_buf(),
                    source,
                });
            }
        };

        let prefix = self.prefix();
        let prefix = prefix.to_string_lossy();
        let mut numbers: Vec<u64> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name();
                let digits = name.to_str()?.strip_prefix(&*prefix)?;
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                digits.parse().ok()
            })
            .collect();
        numbers.sort_unstable();
        Ok(numbers)
    }

    /// Plan the next rotation, keeping the newest `keep` backups.
    ///
    /// `keep` counts the new backup, so at most `keep` backups exist once
    /// the rotation is applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing backups cannot be listed or the
    /// chain has reached the largest representable number.
    pub fn plan(&self, keep: usize) -> Result<Rotation, WriteError> {
        let existing = self.scan()?;
        let mut number = existing.last().copied().unwrap_or(1).max(1);
        while self.path(number).exists() {
            number = number
                .checked_add(1)
                .ok_or_else(|| WriteError::BackupsExhausted {
                    path: self.dest.clone(),
                })?;
        }

        let keep = u64::try_from(keep).unwrap_or(u64::MAX);
        let oldest_kept = number.saturating_sub(keep);
        let prune = existing
            .iter()
            .copied()
            .filter(|&n| n <= oldest_kept)
            .map(|n| self.path(n))
            .collect();

        Ok(Rotation {
            path: self.path(number),
            number,
            prune,
        })
    }

    fn prefix(&self) -> OsString {
        let mut name = self.dest.file_name().map(OsString::from).unwrap_or_default();
        name.push(&self.suffix);
        name
    }
}
