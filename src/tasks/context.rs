//! Shared execution context for merge tasks.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::MergeProfile;
use crate::logging::Log;
use crate::platform::{ConfigDirs, Platform};
use crate::resources::SafeWriter;

/// Which directory plays which role in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// Platform whose values win conflicts.
    pub primary: Platform,
    /// Platform the merge is made for; forced values resolve for it.
    pub secondary: Platform,
    /// Config directory of each platform.
    pub dirs: ConfigDirs,
    /// Directory receiving every merged file.
    pub destination: PathBuf,
}

impl MergePlan {
    /// Whether both roles name the same platform.
    #[must_use]
    pub fn same_platform(&self) -> bool {
        self.primary == self.secondary
    }

    /// `name` inside the primary platform's config directory.
    #[must_use]
    pub fn primary_file(&self, name: &str) -> PathBuf {
        self.dirs.file(self.primary, name)
    }

    /// `name` inside the secondary platform's config directory.
    #[must_use]
    pub fn secondary_file(&self, name: &str) -> PathBuf {
        self.dirs.file(self.secondary, name)
    }

    /// `name` inside the destination directory.
    #[must_use]
    pub fn destination_file(&self, name: &str) -> PathBuf {
        self.destination.join(name)
    }

    /// Destination directory.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

/// Shared state for every task of one run.
pub struct Context {
    /// Managed files and their policies.
    pub profile: Arc<MergeProfile>,
    /// Roles and directories.
    pub plan: MergePlan,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Writer for every destination file.
    pub writer: SafeWriter,
    /// Whether to perform a dry run (compute and report, write nothing).
    pub dry_run: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("profile", &self.profile)
            .field("plan", &self.plan)
            .field("log", &"<dyn Log>")
            .field("writer", &self.writer)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Context {
    /// Create a context whose writer follows the profile's backup policy.
    #[must_use]
    pub fn new(profile: MergeProfile, plan: MergePlan, log: Arc<dyn Log>, dry_run: bool) -> Self {
        let writer = SafeWriter::new(profile.backup.clone(), dry_run, Arc::clone(&log));
        Self {
            profile: Arc::new(profile),
            plan,
            log,
            writer,
            dry_run,
        }
    }
}
