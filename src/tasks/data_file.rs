//! The opaque data file.
use super::helpers::{finish, log_backups};
use super::{Context, Task, TaskResult};
use crate::error::MergeToolError;

/// Copy the primary platform's data file into the destination.
///
/// Backups are taken of the destination's existing data file.  Only runs
/// when the two roles are different platforms.
#[derive(Debug, Default)]
pub struct CopyDataFile;

impl Task for CopyDataFile {
    fn name(&self) -> &str {
        "Copy data file"
    }

    fn file<'a>(&'a self, ctx: &'a Context) -> &'a str {
        &ctx.profile.data_file
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.plan.same_platform()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult, MergeToolError> {
        let name = &ctx.profile.data_file;
        let src = ctx.plan.primary_file(name);
        let dest = ctx.plan.destination_file(name);

        let written = ctx.writer.copy(&src, &dest)?;
        ctx.log
            .info(&format!("{} -> {}", src.display(), dest.display()));
        log_backups(ctx, &written);
        Ok(finish(ctx))
    }
}
