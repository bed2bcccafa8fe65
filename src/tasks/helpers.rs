//! Shared steps of the merge tasks.
use crate::config::ManagedFile;
use crate::error::MergeToolError;
use crate::merge;
use crate::resources::WriteOutcome;

use super::{Context, TaskResult};

/// Merge `file` from the primary and secondary directories and write the
/// result into the destination.
///
/// # Errors
///
/// Returns an error if either input cannot be parsed or the result cannot
/// be written.
pub fn merge_and_write(ctx: &Context, file: &ManagedFile) -> Result<TaskResult, MergeToolError> {
    let primary = ctx.plan.primary_file(&file.name);
    let secondary = ctx.plan.secondary_file(&file.name);
    let dest = ctx.plan.destination_file(&file.name);
    ctx.log.debug(&format!("primary: {}", primary.display()));
    ctx.log.debug(&format!("secondary: {}", secondary.display()));

    let outcome = merge::merge_files(&primary, &secondary, ctx.plan.secondary, &file.policy)?;
    for (key, value) in &outcome.forced {
        ctx.log.debug(&format!("-> {key} {value}"));
    }
    for key in &outcome.dropped {
        ctx.log
            .debug(&format!("dropped stale key {key} (absent from secondary)"));
    }

    let written = ctx.writer.write(&outcome.content, &dest)?;
    ctx.log
        .info(&format!("{} lines -> {}", outcome.line_count, dest.display()));
    log_backups(ctx, &written);
    Ok(finish(ctx))
}

/// Report the backup a real write created.
pub fn log_backups(ctx: &Context, written: &WriteOutcome) {
    if ctx.dry_run {
        return;
    }
    if let Some(backup) = &written.backup {
        ctx.log.info(&format!("backup: {}", backup.display()));
    }
    if !written.pruned.is_empty() {
        ctx.log
            .debug(&format!("pruned {} old backup(s)", written.pruned.len()));
    }
}

/// `DryRun` in dry-run mode, `Ok` otherwise.
#[must_use]
pub const fn finish(ctx: &Context) -> TaskResult {
    if ctx.dry_run {
        TaskResult::DryRun
    } else {
        TaskResult::Ok
    }
}
