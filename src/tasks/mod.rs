//! Named units of work that make up one merge run.
//!
//! The order is fixed: the settings file first, then each keybinding file,
//! then the data file.  Keybindings and the data file only apply when the
//! primary and secondary platforms differ.
pub mod context;
pub mod data_file;
pub mod helpers;
pub mod keybindings;
pub mod settings;

pub use context::{Context, MergePlan};

use crate::config::MergeProfile;
use crate::error::MergeToolError;
use crate::logging::TaskStatus;

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use dtmerge::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let dry = TaskResult::DryRun;
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(dry, TaskResult::DryRun));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task ran in dry-run mode.
    DryRun,
}

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Managed file this task writes.
    fn file<'a>(&'a self, ctx: &'a Context) -> &'a str;

    /// Whether this task applies to the current plan.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if an input cannot be parsed or an output cannot be
    /// written.
    fn run(&self, ctx: &Context) -> Result<TaskResult, MergeToolError>;
}

/// Every task of a merge run for `profile`, in execution order.
#[must_use]
pub fn all_merge_tasks(profile: &MergeProfile) -> Vec<Box<dyn Task>> {
    let mut tasks: Vec<Box<dyn Task>> = vec![Box::new(settings::MergeSettings)];
    tasks.extend(
        profile
            .keybindings
            .iter()
            .cloned()
            .map(|file| Box::new(keybindings::MergeKeybindings::new(file)) as Box<dyn Task>),
    );
    tasks.push(Box::new(data_file::CopyDataFile));
    tasks
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns the task's error, with the task name attached, after recording
/// it as failed.
pub fn execute(task: &dyn Task, ctx: &Context) -> anyhow::Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, Some("same platform"));
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            Ok(())
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
            Ok(())
        }
        Err(e) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&e.to_string()));
            Err(anyhow::Error::new(e).context(format!(
                "task '{}' failed for {}",
                task.name(),
                task.file(ctx)
            )))
        }
    }
}

/// Shared helpers for task unit tests.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub mod test_helpers {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::{Context, MergePlan};
    use crate::config::darktable;
    use crate::logging::{Log, MemoryLog};
    use crate::platform::{ConfigDirs, Platform};

    /// Temporary Linux, Windows and destination directories plus a plan
    /// over them.
    #[derive(Debug)]
    pub struct Fixture {
        _tmp: tempfile::TempDir,
        /// Plan handed to every context.
        pub plan: MergePlan,
        /// Sink shared by every context.
        pub log: Arc<MemoryLog>,
    }

    impl Fixture {
        /// Fixture with the given roles and a separate destination directory.
        pub fn new(primary: Platform, secondary: Platform) -> Self {
            let tmp = tempfile::tempdir().unwrap();
            let dirs = ConfigDirs::new(tmp.path().join("linux"), tmp.path().join("windows"));
            for platform in Platform::ALL {
                std::fs::create_dir_all(dirs.dir(platform)).unwrap();
            }
            let plan = MergePlan {
                primary,
                secondary,
                dirs,
                destination: tmp.path().join("out"),
            };
            Self {
                _tmp: tmp,
                plan,
                log: Arc::new(MemoryLog::new()),
            }
        }

        /// Context over the built-in darktable profile.
        pub fn context(&self, dry_run: bool) -> Context {
            Context::new(
                darktable::profile(),
                self.plan.clone(),
                Arc::clone(&self.log) as Arc<dyn Log>,
                dry_run,
            )
        }

        /// Write `content` to `name` in `platform`'s config directory.
        pub fn write(&self, platform: Platform, name: &str, content: &str) {
            std::fs::write(self.plan.dirs.file(platform, name), content).unwrap();
        }

        /// Write `content` to `name` in the destination directory.
        pub fn write_destination(&self, name: &str, content: &str) {
            std::fs::create_dir_all(&self.plan.destination).unwrap();
            std::fs::write(self.destination_path(name), content).unwrap();
        }

        /// Path of `name` in the destination directory.
        pub fn destination_path(&self, name: &str) -> PathBuf {
            self.plan.destination_file(name)
        }

        /// Content of `name` in the destination directory.
        pub fn read_destination(&self, name: &str) -> String {
            std::fs::read_to_string(self.destination_path(name)).unwrap()
        }
    }
}
