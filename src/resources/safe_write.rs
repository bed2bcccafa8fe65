//! Backup-preserving writes.
//!
//! Every write follows the same order: stage the new content in a
//! temporary file beside the destination, copy the current destination into
//! the next numbered backup, prune backups outside the retention window, and
//! finally move the temporary file over the destination.  The destination is
//! only ever replaced whole.
use std::fs::{File, Permissions};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::backup::BackupChain;
use super::fs::{ensure_parent_dir, persist, stage_temp};
use crate::config::BackupPolicy;
use crate::error::WriteError;
use crate::logging::Log;

/// What a write did (or, in dry-run mode, would do) besides replacing the
/// destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Backup that received the previous destination content.
    pub backup: Option<PathBuf>,
    /// Old backups removed to honour the retention count.
    pub pruned: Vec<PathBuf>,
}

/// Writes destination files with numbered backups.
pub struct SafeWriter {
    policy: BackupPolicy,
    dry_run: bool,
    log: Arc<dyn Log>,
}

impl std::fmt::Debug for SafeWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeWriter")
            .field("policy", &self.policy)
            .field("dry_run", &self.dry_run)
            .field("log", &"<dyn Log>")
            .finish()
    }
}

impl SafeWriter {
    /// Create a writer using `policy` for backup retention.
    ///
    /// With `dry_run` set nothing on disk is created, modified or removed;
    /// intended actions are reported through [`Log::dry_run`].
    #[must_use]
    pub fn new(policy: BackupPolicy, dry_run: bool, log: Arc<dyn Log>) -> Self {
        Self {
            policy,
            dry_run,
            log,
        }
    }

    /// Replace `dest` with `content`.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination directory, the temporary file,
    /// the backup, or the final placement cannot be written.
    pub fn write(&self, content: &str, dest: &Path) -> Result<WriteOutcome, WriteError> {
        self.place(content.as_bytes(), content.len(), None, dest)
    }

    /// Replace `dest` with a byte-for-byte copy of `src`, carrying over the
    /// permissions of `src`.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::MissingSource`] if `src` does not exist, and
    /// the errors of [`write`](Self::write) otherwise.
    pub fn copy(&self, src: &Path, dest: &Path) -> Result<WriteOutcome, WriteError> {
        let file = File::open(src).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                WriteError::MissingSource {
                    path: src.to_path_buf(),
                }
            } else {
                WriteError::Io {
                    action: "open",
                    path: src.to_path_buf(),
                    source,
                }
            }
        })?;
        let metadata = file.metadata().map_err(|source| WriteError::Io {
            action: "read metadata of",
            path: src.to_path_buf(),
            source,
        })?;
        let len = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        self.place(file, len, Some(metadata.permissions()), dest)
    }

    fn place(
        &self,
        src: impl Read,
        len: usize,
        permissions: Option<Permissions>,
        dest: &Path,
    ) -> Result<WriteOutcome, WriteError> {
        if self.dry_run {
            return self.preview(len, dest);
        }

        ensure_parent_dir(dest)?;
        let tmp = stage_temp(dest, src)?;
        if let Some(permissions) = permissions {
            tmp.as_file()
                .set_permissions(permissions)
                .map_err(|source| WriteError::Io {
                    action: "set permissions of",
                    path: tmp.path().to_path_buf(),
                    source,
                })?;
        }
        let outcome = self.rotate(dest)?;
        persist(tmp, dest)?;
        self.log
            .debug(&format!("wrote {len} bytes to {}", dest.display()));
        Ok(outcome)
    }

    fn rotate(&self, dest: &Path) -> Result<WriteOutcome, WriteError> {
        if !dest.is_file() {
            return Ok(WriteOutcome::default());
        }

        let chain = BackupChain::new(dest, self.policy.suffix.as_str());
        let rotation = chain.plan(self.policy.keep)?;
        std::fs::copy(dest, &rotation.path).map_err(|source| WriteError::Io {
            action: "create backup",
            path: rotation.path.clone(),
            source,
        })?;
        self.log
            .debug(&format!("backup: {}", rotation.path.display()));

        let mut pruned = Vec::with_capacity(rotation.prune.len());
        for path in rotation.prune {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    self.log
                        .debug(&format!("removed old backup {}", path.display()));
                    pruned.push(path);
                }
                Err(e) => self
                    .log
                    .warn(&format!("cannot remove old backup {}: {e}", path.display())),
            }
        }

        Ok(WriteOutcome {
            backup: Some(rotation.path),
            pruned,
        })
    }

    fn preview(&self, len: usize, dest: &Path) -> Result<WriteOutcome, WriteError> {
        let mut outcome = WriteOutcome::default();
        if dest.is_file() {
            let rotation =
                BackupChain::new(dest, self.policy.suffix.as_str()).plan(self.policy.keep)?;
            self.log.dry_run(&format!(
                "would back up {} to {}",
                dest.display(),
                rotation.path.display()
            ));
            for path in &rotation.prune {
                self.log
                    .dry_run(&format!("would remove old backup {}", path.display()));
            }
            outcome = WriteOutcome {
                backup: Some(rotation.path),
                pruned: rotation.prune,
            };
        }
        self.log
            .dry_run(&format!("would write {len} bytes to {}", dest.display()));
        Ok(outcome)
    }
}
