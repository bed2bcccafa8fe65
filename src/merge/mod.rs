//! Config merge engine.
//!
//! Reconciles a primary and a secondary `key=value` file into one
//! deterministic text according to a [`MergePolicy`]:
//!
//! - **duplicates allowed**: every distinct value of every key is kept;
//! - **single-valued**: the primary value wins, except for sticky keys
//!   (matched by `keep_keys`) which take the secondary value and are dropped
//!   when the secondary no longer defines them.
//!
//! Forced keys are applied last, and output lines are sorted.  The engine
//! does not log; callers inspect the returned [`MergeOutcome`].
mod matcher;

pub use matcher::KeyMatcher;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::config::MergePolicy;
use crate::config::kv::{self, Entry, SEPARATOR};
use crate::error::ConfigError;
use crate::platform::Platform;

/// One value per key; later duplicates overwrite earlier ones.
pub type SingleValued = BTreeMap<String, String>;

/// Every distinct value per key.
pub type MultiValued = BTreeMap<String, BTreeSet<String>>;

/// A parsed config file in the shape its policy requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedFile {
    /// Parsed for a single-valued policy.
    Single(SingleValued),
    /// Parsed for a duplicates-allowed policy.
    Multi(MultiValued),
}

impl ParsedFile {
    /// Collect `entries` (in file order) into the shape selected by
    /// `allow_duplicates`.
    #[must_use]
    pub fn from_entries(entries: Vec<Entry>, allow_duplicates: bool) -> Self {
        if allow_duplicates {
            let mut map = MultiValued::new();
            for (key, value) in entries {
                map.entry(key).or_default().insert(value);
            }
            Self::Multi(map)
        } else {
            Self::Single(entries.into_iter().collect())
        }
    }

    /// Replace every value of `key` with `value`.
    pub fn set(&mut self, key: &str, value: &str) {
        match self {
            Self::Single(map) => {
                map.insert(key.to_string(), value.to_string());
            }
            Self::Multi(map) => {
                map.insert(key.to_string(), BTreeSet::from([value.to_string()]));
            }
        }
    }

    /// Every `key=value` line, sorted lexicographically.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = match self {
            Self::Single(map) => map
                .iter()
                .map(|(key, value)| format!("{key}{SEPARATOR}{value}"))
                .collect(),
            Self::Multi(map) => map
                .iter()
                .flat_map(|(key, values)| {
                    values
                        .iter()
                        .map(move |value| format!("{key}{SEPARATOR}{value}"))
                })
                .collect(),
        };
        lines.sort_unstable();
        lines
    }
}

/// Result of one merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Serialized merged file.
    pub content: String,
    /// Number of lines in `content`.
    pub line_count: usize,
    /// Forced keys with the value written for each, in key order.
    pub forced: Vec<(String, String)>,
    /// Sticky keys dropped because only the primary still defined them.
    pub dropped: Vec<String>,
}

/// Merge the files at `primary` and `secondary`.
///
/// Missing files count as empty.  Forced values are resolved for `platform`.
///
/// # Errors
///
/// Returns an error if either file cannot be read or has a malformed line,
/// or if a sticky-key pattern is invalid.
pub fn merge_files(
    primary: &Path,
    secondary: &Path,
    platform: Platform,
    policy: &MergePolicy,
) -> Result<MergeOutcome, ConfigError> {
    let primary = kv::read_entries(primary)?;
    let secondary = kv::read_entries(secondary)?;
    merge_entries(primary, secondary, platform, policy)
}

/// Merge already-parsed entries.
///
/// # Errors
///
/// Returns an error if a sticky-key pattern is invalid.
pub fn merge_entries(
    primary: Vec<Entry>,
    secondary: Vec<Entry>,
    platform: Platform,
    policy: &MergePolicy,
) -> Result<MergeOutcome, ConfigError> {
    let sticky = KeyMatcher::new(&policy.keep_keys)?;
    let primary = ParsedFile::from_entries(primary, policy.allow_duplicates);
    let secondary = ParsedFile::from_entries(secondary, policy.allow_duplicates);

    let mut dropped = Vec::new();
    let mut merged = match (primary, secondary) {
        (ParsedFile::Single(primary), ParsedFile::Single(secondary)) => {
            let (merged, stale) = merge_single(&primary, &secondary, &sticky);
            dropped = stale;
            ParsedFile::Single(merged)
        }
        (ParsedFile::Multi(primary), ParsedFile::Multi(secondary)) => {
            ParsedFile::Multi(merge_multi(primary, secondary))
        }
        (primary, _) => primary,
    };

    let mut forced = Vec::with_capacity(policy.forced_keys.len());
    for (key, target) in &policy.forced_keys {
        let value = target.resolve(platform);
        merged.set(key, value);
        forced.push((key.clone(), value.to_string()));
    }

    let lines = merged.lines();
    Ok(MergeOutcome {
        line_count: lines.len(),
        content: lines.join("\n"),
        forced,
        dropped,
    })
}

/// Primary wins, sticky keys come from the secondary, and sticky keys the
/// secondary no longer has are removed.
fn merge_single(
    primary: &SingleValued,
    secondary: &SingleValued,
    sticky: &KeyMatcher,
) -> (SingleValued, Vec<String>) {
    let mut merged = primary.clone();
    for (key, secondary_value) in secondary {
        let value = if sticky.is_match(key) {
            secondary_value
        } else {
            primary.get(key).unwrap_or(secondary_value)
        };
        merged.insert(key.clone(), value.clone());
    }

    let stale: Vec<String> = primary
        .keys()
        .filter(|key| !secondary.contains_key(*key) && sticky.is_match(key))
        .cloned()
        .collect();
    for key in &stale {
        merged.remove(key);
    }
    (merged, stale)
}

fn merge_multi(mut primary: MultiValued, secondary: MultiValued) -> MultiValued {
    for (key, values) in secondary {
        primary.entry(key).or_default().extend(values);
    }
    primary
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::unreachable)]
mod tests {
    use super::*;
    use crate::config::ForcedValue;
    use crate::platform::PlatformMap;

    fn entries(content: &str) -> Vec<Entry> {
        kv::parse_str(content, Path::new("test")).unwrap()
    }

    fn single(keep_keys: &[&str]) -> MergePolicy {
        MergePolicy {
            allow_duplicates: false,
            keep_keys: keep_keys.iter().map(ToString::to_string).collect(),
            forced_keys: BTreeMap::new(),
        }
    }

    fn merge(primary: &str, secondary: &str, policy: &MergePolicy) -> MergeOutcome {
        merge_entries(entries(primary), entries(secondary), Platform::Linux, policy).unwrap()
    }

    fn as_map(content: &str) -> SingleValued {
        entries(content).into_iter().collect()
    }

    // -----------------------------------------------------------------------
    // Single-valued mode
    // -----------------------------------------------------------------------

    #[test]
    fn primary_wins_and_sticky_key_comes_from_secondary() {
        let out = merge("a=1", "a=2\nb=3", &single(&["b.*"]));
        assert_eq!(out.content, "a=1\nb=3");
    }

    #[test]
    fn sticky_key_ignores_primary_value() {
        let out = merge("opencl=TRUE\nx=1", "opencl=FALSE\nx=2", &single(&["opencl.*"]));
        let merged = as_map(&out.content);
        assert_eq!(merged["opencl"], "FALSE");
        assert_eq!(merged["x"], "1");
    }

    #[test]
    fn stale_sticky_key_is_dropped() {
        let out = merge("x=old\ny=keep", "y=other", &single(&["x"]));
        assert!(!as_map(&out.content).contains_key("x"));
        assert_eq!(out.dropped, vec!["x".to_string()]);
        assert_eq!(as_map(&out.content)["y"], "keep");
    }

    #[test]
    fn primary_only_key_survives_when_not_sticky() {
        let out = merge("only_primary=1", "", &single(&["x.*"]));
        assert_eq!(out.content, "only_primary=1");
        assert!(out.dropped.is_empty());
    }

    #[test]
    fn secondary_fills_gaps() {
        let out = merge("", "gap=from-secondary", &single(&[]));
        assert_eq!(out.content, "gap=from-secondary");
    }

    #[test]
    fn later_duplicate_in_one_file_overwrites() {
        let out = merge("k=1\nk=2", "", &single(&[]));
        assert_eq!(out.content, "k=2");
    }

    #[test]
    fn both_empty_gives_empty_output() {
        let out = merge("", "", &single(&["a"]));
        assert_eq!(out.content, "");
        assert_eq!(out.line_count, 0);
    }

    // -----------------------------------------------------------------------
    // Duplicates-allowed mode
    // -----------------------------------------------------------------------

    #[test]
    fn union_keeps_every_distinct_value() {
        let out = merge("k=1", "k=2\nk=3", &MergePolicy::duplicates_allowed());
        assert_eq!(out.content, "k=1\nk=2\nk=3");
        assert_eq!(out.line_count, 3);
    }

    #[test]
    fn union_does_not_duplicate_shared_values() {
        let out = merge("k=1\nj=x", "k=1\nj=x", &MergePolicy::duplicates_allowed());
        assert_eq!(out.content, "j=x\nk=1");
    }

    #[test]
    fn union_ignores_keep_keys() {
        let mut policy = MergePolicy::duplicates_allowed();
        policy.keep_keys.push("k".to_string());
        let out = merge("k=1", "", &policy);
        assert_eq!(out.content, "k=1");
        assert!(out.dropped.is_empty());
    }

    // -----------------------------------------------------------------------
    // Forced keys
    // -----------------------------------------------------------------------

    #[test]
    fn forced_literal_overwrites_both_sides() {
        let mut policy = single(&[]);
        policy
            .forced_keys
            .insert("write_sidecar_files".to_string(), ForcedValue::from("after edit"));
        let out = merge("write_sidecar_files=never", "write_sidecar_files=on import", &policy);
        assert_eq!(out.content, "write_sidecar_files=after edit");
        assert_eq!(
            out.forced,
            vec![("write_sidecar_files".to_string(), "after edit".to_string())]
        );
    }

    #[test]
    fn forced_per_platform_value_uses_target_platform() {
        let mut policy = single(&[]);
        policy.forced_keys.insert(
            "lut3d/def_path".to_string(),
            ForcedValue::PerPlatform(PlatformMap::new("/lin".to_string(), r"D:\win".to_string())),
        );
        let out =
            merge_entries(Vec::new(), Vec::new(), Platform::Windows, &policy).unwrap();
        assert_eq!(out.content, r"lut3d/def_path=D:\win");
    }

    #[test]
    fn forced_key_beats_sticky_key() {
        let mut policy = single(&["k"]);
        policy.forced_keys.insert("k".to_string(), ForcedValue::from("forced"));
        let out = merge("k=p", "k=s", &policy);
        assert_eq!(out.content, "k=forced");
    }

    #[test]
    fn forced_key_replaces_union_values() {
        let mut policy = MergePolicy::duplicates_allowed();
        policy.forced_keys.insert("k".to_string(), ForcedValue::from("only"));
        let out = merge("k=1\nk=2", "k=3", &policy);
        assert_eq!(out.content, "k=only");
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    #[test]
    fn output_lines_are_sorted_as_lines() {
        // '.' sorts before '=' so "a.b=..." precedes "a=...".
        let out = merge("a=2\na.b=1\nZ=0", "", &single(&[]));
        insta::assert_snapshot!(out.content, @r"
        Z=0
        a.b=1
        a=2
        ");
    }

    #[test]
    fn output_is_independent_of_input_order() {
        let a = merge("b=2\na=1\nc=3", "d=4\ne=5", &single(&["e"]));
        let b = merge("c=3\na=1\nb=2", "e=5\nd=4", &single(&["e"]));
        assert_eq!(a.content, b.content);
    }

    #[test]
    fn values_containing_separator_round_trip() {
        let out = merge("pattern=$(A)=$(B)", "", &single(&[]));
        assert_eq!(out.content, "pattern=$(A)=$(B)");
        assert_eq!(as_map(&out.content)["pattern"], "$(A)=$(B)");
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    #[test]
    fn merge_is_idempotent_when_output_is_fed_back() {
        let mut policy = single(&["sticky.*"]);
        policy.forced_keys.insert("forced".to_string(), ForcedValue::from("F"));
        let primary = "a=1\nb=2\nsticky_gone=p\nsticky_kept=p\nforced=x";
        let secondary = "a=9\nc=3\nsticky_kept=s";

        let once = merge(primary, secondary, &policy);
        let as_secondary = merge(primary, &once.content, &policy);
        let as_primary = merge(&once.content, secondary, &policy);
        assert_eq!(as_secondary.content, once.content);
        assert_eq!(as_primary.content, once.content);
    }

    #[test]
    fn union_law_holds_for_every_key() {
        let primary = "k=1\nm=a\nm=b";
        let secondary = "k=2\nk=3\nn=z\nm=b";
        let out = merge(primary, secondary, &MergePolicy::duplicates_allowed());

        let ParsedFile::Multi(merged) =
            ParsedFile::from_entries(entries(&out.content), true)
        else {
            unreachable!()
        };
        let ParsedFile::Multi(p) = ParsedFile::from_entries(entries(primary), true) else {
            unreachable!()
        };
        let ParsedFile::Multi(s) = ParsedFile::from_entries(entries(secondary), true) else {
            unreachable!()
        };
        let keys: BTreeSet<&String> = p.keys().chain(s.keys()).collect();
        assert_eq!(merged.len(), keys.len());
        for key in keys {
            let expected: BTreeSet<String> = p
                .get(key)
                .into_iter()
                .chain(s.get(key))
                .flatten()
                .cloned()
                .collect();
            assert_eq!(merged[key], expected, "key {key}");
        }
    }

    #[test]
    fn set_replaces_every_value() {
        let mut parsed = ParsedFile::from_entries(entries("k=1\nk=2"), true);
        parsed.set("k", "3");
        assert_eq!(parsed.lines(), ["k=3"]);
    }

    #[test]
    fn merge_files_treats_missing_files_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let secondary = dir.path().join("secondary");
        std::fs::write(&secondary, "b=3\n").unwrap();
        let out = merge_files(
            &dir.path().join("absent"),
            &secondary,
            Platform::Linux,
            &single(&[]),
        )
        .unwrap();
        assert_eq!(out.content, "b=3");
    }

    #[test]
    fn merge_files_reports_malformed_line() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("primary");
        std::fs::write(&primary, "a=1\nnot a pair\n").unwrap();
        let err = merge_files(&primary, &dir.path().join("absent"), Platform::Linux, &single(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MalformedLine { line: 2, .. }));
    }
}
