//! Newest-platform detection for automatic precedence.
//!
//! Dual-boot machines often disagree about the hardware clock (one system
//! keeps it in UTC, the other in local time), so the Linux timestamp can be
//! shifted by a whole number of hours before the comparison.
use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::PlatformError;
use crate::platform::{ConfigDirs, Platform};

/// Inputs and result of one newest-platform decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewestReport {
    /// The platform whose marker file is newer; Linux on a tie.
    pub platform: Platform,
    /// Raw modification time of the Linux marker.
    pub linux: DateTime<Utc>,
    /// Linux modification time after subtracting the clock skew.
    pub linux_adjusted: DateTime<Utc>,
    /// Modification time of the Windows marker.
    pub windows: DateTime<Utc>,
}

/// Decide which platform's `marker` file was modified last.
///
/// `skew_hours` is subtracted from the Linux timestamp and may be negative.
///
/// # Errors
///
/// Returns [`PlatformError::MarkerUnreadable`] if either marker is missing
/// or its modification time cannot be read.
pub fn pick_newer(
    dirs: &ConfigDirs,
    marker: &str,
    skew_hours: i64,
) -> Result<NewestReport, PlatformError> {
    let linux = modified(Platform::Linux, &dirs.file(Platform::Linux, marker))?;
    let windows = modified(Platform::Windows, &dirs.file(Platform::Windows, marker))?;
    let linux_adjusted = shift_back(linux, skew_hours);

    let platform = if linux_adjusted >= windows {
        Platform::Linux
    } else {
        Platform::Windows
    };
    Ok(NewestReport {
        platform,
        linux,
        linux_adjusted,
        windows,
    })
}

fn modified(platform: Platform, path: &Path) -> Result<DateTime<Utc>, PlatformError> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .map_err(|source| PlatformError::MarkerUnreadable {
            platform,
            path: path.to_path_buf(),
            source,
        })
}

/// `ts - hours`, saturating at the representable range.
fn shift_back(ts: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
    let saturated = if hours < 0 {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    };
    TimeDelta::try_hours(hours)
        .and_then(|delta| ts.checked_sub_signed(delta))
        .unwrap_or(saturated)
}
