//! The merge command: resolve roles, then run every merge task.
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::{report_warnings, run_tasks_to_completion};
use crate::cli::{Cli, MergeOption};
use crate::config::MergeProfile;
use crate::error::{MergeToolError, PlatformError};
use crate::logging::Log;
use crate::newest;
use crate::platform::{ConfigDirs, Platform};
use crate::tasks::{self, Context, MergePlan};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Run the merge command.
///
/// # Errors
///
/// Returns an error for invalid argument combinations, an unusable profile,
/// an unreadable newest-platform marker, or the first failing task.
pub fn run(cli: &Cli, log: Arc<dyn Log>) -> Result<()> {
    log.info(&format!("dtmerge {}", crate::version()));

    if cli.dry_run || cli.verbose {
        log.stage("Program arguments");
        for (name, value) in cli.describe() {
            log.info(&format!("{name}: {value}"));
        }
    }

    log.stage("Loading profile");
    let (profile, warnings) = MergeProfile::load(cli.profile.as_deref())
        .context("failed to load merge profile")?;
    match &cli.profile {
        Some(path) => log.info(&format!("profile: {}", path.display())),
        None => log.info("profile: built-in darktable"),
    }
    report_warnings(&*log, &warnings);

    let plan = resolve_plan(cli, profile.marker_file(), &*log)?;
    let (primary, secondary) = (plan.primary, plan.secondary);
    log.info(&format!(
        "primary: {primary}, secondary: {secondary}, destination: {}",
        plan.destination().display()
    ));
    if plan.same_platform() {
        log.info(&format!(
            "same platform ({primary} and {secondary}), only {} is merged",
            profile.settings.name
        ));
    }

    let all_tasks = tasks::all_merge_tasks(&profile);
    let ctx = Context::new(profile, plan, log, cli.dry_run);
    run_tasks_to_completion(all_tasks.iter().map(AsRef::as_ref), &ctx)
}

/// Resolve both roles and the destination of a run.
///
/// # Errors
///
/// Returns [`MergeToolError::Usage`] when no target platform or destination
/// is given and [`MergeToolError::Platform`] when `--merge newest` cannot
/// read a marker.
pub fn resolve_plan(cli: &Cli, marker: &str, log: &dyn Log) -> Result<MergePlan, MergeToolError> {
    let secondary = cli.target_platform()?;
    let destination = cli.destination()?;
    let dirs = cli.config_dirs();
    let primary = resolve_primary(cli.merge, &dirs, marker, cli.system_clock_delta, log)?;
    Ok(MergePlan {
        primary,
        secondary,
        dirs,
        destination,
    })
}

/// The primary platform: named by `option`, or decided by marker times.
fn resolve_primary(
    option: MergeOption,
    dirs: &ConfigDirs,
    marker: &str,
    skew_hours: i64,
    log: &dyn Log,
) -> Result<Platform, PlatformError> {
    if let Some(platform) = option.platform() {
        return Ok(platform);
    }

    log.stage("Determining newest config directory");
    let report = newest::pick_newer(dirs, marker, skew_hours)?;
    log.debug(&format!(
        "linux time (before applying delta): {}",
        report.linux.format(TIME_FORMAT)
    ));
    log.debug(&format!(
        "linux time (after applying delta): {}",
        report.linux_adjusted.format(TIME_FORMAT)
    ));
    log.debug(&format!("windows time: {}", report.windows.format(TIME_FORMAT)));
    log.info(&format!("newer platform: {}", report.platform));
    Ok(report.platform)
}
