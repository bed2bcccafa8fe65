//! The single-valued settings file.
use super::helpers::merge_and_write;
use super::{Context, Task, TaskResult};
use crate::error::MergeToolError;

/// Merge and rewrite the settings file.
///
/// Runs even when both roles are the same platform so that forced keys are
/// re-applied.
#[derive(Debug, Default)]
pub struct MergeSettings;

impl Task for MergeSettings {
    fn name(&self) -> &str {
        "Merge settings"
    }

    fn file<'a>(&'a self, ctx: &'a Context) -> &'a str {
        &ctx.profile.settings.name
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult, MergeToolError> {
        merge_and_write(ctx, &ctx.profile.settings)
    }
}
