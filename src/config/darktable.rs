//! Built-in profile for darktable config directories.
use std::collections::BTreeMap;

use super::MergeProfile;
use super::policy::{BackupPolicy, ForcedValue, ManagedFile, MergePolicy};
use crate::platform::PlatformMap;

/// Main settings file; also the marker for newest-platform detection.
pub const DARKTABLERC: &str = "darktablerc";

/// Keybinding files, merged as value unions.
pub const SHORTCUTSRC_FILES: &[&str] = &["shortcutsrc", "shortcutsrc.defaults", "shortcutsrc.edit"];

/// Library database, copied verbatim from the primary side.
pub const DATA_DB: &str = "data.db";

/// Settings that describe the local machine or the local session rather than
/// shared preferences.  They keep the target installation's value.
const STICKY_KEYS: &[&str] = &[
    r"cldevice.*",
    r"context_help.*",
    r"dt_cpubenchmark",
    r"opencl.*",
    r"plugins/darkroom/quick_preset_list",
    r"plugins/lighttable/collect/.*",
    r"plugins/lighttable/filtering/.*",
    r"plugins/lighttable/recentcollect/.*",
    r"plugins/lighttable/tagging/recent_tags",
    r"plugins/print/*",
    r"ui_last/color/.*_filename",
    r"ui_last/export_path",
    r"ui_last/import_custom_places",
    r"ui_last/import_last_directory",
    r"ui_last/import_last_image.*",
    r"ui_last/import_last_place",
    r"ui_last/window.*",
    r"database_cache_quality",
];

const IMAGE_INFOS_PATTERN: &str = "$(RATING_ICONS) $(LABELS_COLORICONS) <b>$(MAKER) $(MODEL) • $(LENS) • $(FILE_NAME).$(FILE_EXTENSION)</b> • <b>SS</b> $(EXIF_EXPOSURE) • <b>f</b>/$(EXIF_APERTURE) • $(EXIF_FOCAL_LENGTH) mm • <b>ISO</b> $(EXIF_ISO) • <b>Time:</b> $(EXIF_DAY).$(EXIF_MONTH).$(EXIF_YEAR:2:2) $(EXIF_HOUR):$(EXIF_MINUTE):$(EXIF_SECOND) • <b>Dimensions:</b> $(SENSOR_WIDTH)x$(SENSOR_HEIGHT) • <b>Export:</b> $(EXPORT_WIDTH)x$(EXPORT_HEIGHT) • <b>OpenCL:</b> $(OPENCL_ACTIVATED)";

const EXTENDED_PATTERN: &str = "$(FILE_NAME).$(FILE_EXTENSION)$(NL)$(EXIF_EXPOSURE) • f/$(EXIF_APERTURE) • $(EXIF_FOCAL_LENGTH)mm • $(EXIF_ISO) ISO $(SIDECAR_TXT)";

const THUMBNAIL_TOOLTIP_PATTERN: &str = "<b>$(FILE_NAME).$(FILE_EXTENSION)</b>$(NL)$(EXIF_DAY)/$(EXIF_MONTH)/$(EXIF_YEAR) $(EXIF_HOUR):$(EXIF_MINUTE):$(EXIF_SECOND)$(NL)$(EXIF_EXPOSURE) • f/$(EXIF_APERTURE) • $(EXIF_FOCAL_LENGTH) mm • $(EXIF_ISO) ISO";

fn per_platform(linux: &str, windows: &str) -> ForcedValue {
    ForcedValue::PerPlatform(PlatformMap::new(linux.to_string(), windows.to_string()))
}

fn forced_keys() -> BTreeMap<String, ForcedValue> {
    [
        (
            "plugins/darkroom/lut3d/def_path",
            per_platform("/media/hdd/Fotografie/Vendor", r"D:\Fotografie\Vendor"),
        ),
        (
            "session/base_directory_pattern",
            per_platform("/media/photography/Recordings/Tether", r"F:\Recordings\Tether"),
        ),
        ("plugins/darkroom/image_infos_pattern", IMAGE_INFOS_PATTERN.into()),
        ("plugins/imageio/storage/disk/overwrite", "0".into()),
        ("plugins/lighttable/extended_pattern", EXTENDED_PATTERN.into()),
        (
            "plugins/lighttable/thumbnail_tooltip_pattern",
            THUMBNAIL_TOOLTIP_PATTERN.into(),
        ),
        ("ui_last/import_dialog_show_home", "false".into()),
        ("ui_last/import_dialog_show_mounted", "false".into()),
        ("ui_last/import_dialog_show_pictures", "false".into()),
        ("write_sidecar_files", "after edit".into()),
        ("run_crawler_on_start", "true".into()),
        (
            "plugins/darkroom/clipping/extra_aspect_ratios/5:4, 4x5, 2.5% frame",
            "503225806:400000000".into(),
        ),
        (
            "plugins/darkroom/clipping/extra_aspect_ratios/5:4, 4x5, 4% frame",
            "505263157:400000000".into(),
        ),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect()
}

/// The darktable profile: `darktablerc` with sticky and forced keys, the
/// `shortcutsrc` family as unions, and `data.db` copied from the primary.
#[must_use]
pub fn profile() -> MergeProfile {
    MergeProfile {
        marker: None,
        settings: ManagedFile::new(
            DARKTABLERC,
            MergePolicy {
                allow_duplicates: false,
                keep_keys: STICKY_KEYS.iter().map(ToString::to_string).collect(),
                forced_keys: forced_keys(),
            },
        ),
        keybindings: SHORTCUTSRC_FILES
            .iter()
            .map(|name| ManagedFile::new(*name, MergePolicy::duplicates_allowed()))
            .collect(),
        data_file: DATA_DB.to_string(),
        backup: BackupPolicy::default(),
    }
}
