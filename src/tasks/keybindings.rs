//! Duplicate-tolerant keybinding files.
use super::helpers::merge_and_write;
use super::{Context, Task, TaskResult};
use crate::config::ManagedFile;
use crate::error::MergeToolError;

/// Union-merge one keybinding file.
///
/// Only runs when the two roles are different platforms.
#[derive(Debug)]
pub struct MergeKeybindings {
    name: String,
    file: ManagedFile,
}

impl MergeKeybindings {
    /// Task for `file`.
    #[must_use]
    pub fn new(file: ManagedFile) -> Self {
        Self {
            name: format!("Merge {}", file.name),
            file,
        }
    }
}

impl Task for MergeKeybindings {
    fn name(&self) -> &str {
        &self.name
    }

    fn file<'a>(&'a self, _ctx: &'a Context) -> &'a str {
        &self.file.name
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.plan.same_platform()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult, MergeToolError> {
        merge_and_write(ctx, &self.file)
    }
}
