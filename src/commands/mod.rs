//! Top-level command orchestration.
pub mod merge;

use anyhow::Result;

use crate::logging::Log;
use crate::tasks::{self, Context, Task};

/// Execute every task in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the first task error; later tasks are not run.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
) -> Result<()> {
    for task in tasks {
        tasks::execute(task, ctx)?;
    }
    Ok(())
}

/// Log profile validation warnings, if any.
pub fn report_warnings(log: &dyn Log, warnings: &[crate::config::ValidationWarning]) {
    if warnings.is_empty() {
        return;
    }
    log.warn(&format!("found {} profile warning(s):", warnings.len()));
    for warning in warnings {
        log.warn(&format!("  [{}]: {}", warning.item, warning.message));
    }
}
