//! Line-oriented `key=value` config files.
//!
//! The format has no sections, comments or quoting: each line is split on the
//! first `=`, the key is kept verbatim and the value is trimmed.  Blank lines
//! are ignored; any other line without a separator is rejected.
use std::io;
use std::path::Path;

use crate::error::ConfigError;

/// Separator between key and value.
pub const SEPARATOR: char = '=';

/// A `(key, value)` pair in file order.
pub type Entry = (String, String);

/// Split one line into `(key, value)`.
///
/// Returns `None` if the line has no separator.
///
/// # Examples
///
/// ```
/// use dtmerge::config::kv::parse_line;
///
/// assert_eq!(
///     parse_line("ui_last/theme=darktable-elegant-grey \n"),
///     Some(("ui_last/theme".to_string(), "darktable-elegant-grey".to_string()))
/// );
/// // Only the first separator splits.
/// assert_eq!(
///     parse_line("a=b=c").map(|(_, v)| v),
///     Some("b=c".to_string())
/// );
/// assert_eq!(parse_line("no separator"), None);
/// ```
#[must_use]
pub fn parse_line(line: &str) -> Option<Entry> {
    let (key, value) = line.split_once(SEPARATOR)?;
    Some((key.to_string(), value.trim().to_string()))
}

/// Parse `content` into entries, in file order.
///
/// `source` only labels errors.
///
/// # Errors
///
/// Returns [`ConfigError::MalformedLine`] for the first non-blank line that
/// has no separator.
pub fn parse_str(content: &str, source: &Path) -> Result<Vec<Entry>, ConfigError> {
    let mut entries = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some(entry) = parse_line(line) else {
            return Err(ConfigError::MalformedLine {
                file: source.to_path_buf(),
                line: line_num + 1,
                content: line.to_string(),
            });
        };
        entries.push(entry);
    }
    Ok(entries)
}

/// Read and parse the file at `path`.
///
/// A missing file yields no entries: one installation may simply not have
/// created the file yet.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read (including invalid
/// UTF-8) or contains a malformed line.
pub fn read_entries(path: &Path) -> Result<Vec<Entry>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_str(&content, path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use super::*;

    fn src() -> &'static Path {
        Path::new("darktablerc")
    }

    #[test]
    fn parse_line_trims_value_only() {
        let (k, v) = parse_line(" key = value ").unwrap();
        assert_eq!(k, " key ");
        assert_eq!(v, "value");
    }

    #[test]
    fn parse_line_empty_value() {
        assert_eq!(
            parse_line("plugins/lighttable/tagging/recent_tags="),
            Some((
                "plugins/lighttable/tagging/recent_tags".to_string(),
                String::new()
            ))
        );
    }

    #[test]
    fn parse_str_keeps_file_order_and_duplicates() {
        let entries = parse_str("b=2\na=1\nb=3\n", src()).unwrap();
        assert_eq!(
            entries,
            vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn parse_str_handles_crlf() {
        let entries = parse_str("a=1\r\nb=2\r\n", src()).unwrap();
        assert_eq!(entries[0].1, "1");
        assert_eq!(entries[1].0, "b");
    }

    #[test]
    fn parse_str_skips_blank_lines() {
        let entries = parse_str("a=1\n\n   \nb=2", src()).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn parse_str_rejects_line_without_separator() {
        let err = parse_str("a=1\nbroken\n", src()).unwrap_err();
        match err {
            ConfigError::MalformedLine {
                file,
                line,
                content,
            } => {
                assert_eq!(file, Path::new("darktablerc"));
                assert_eq!(line, 2);
                assert_eq!(content, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_entries_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let entries = read_entries(&dir.path().join("shortcutsrc")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn read_entries_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortcutsrc");
        std::fs::write(&path, "darkroom/zoom=Ctrl+z\n").unwrap();
        let entries = read_entries(&path).unwrap();
        assert_eq!(
            entries,
            vec![("darkroom/zoom".to_string(), "Ctrl+z".to_string())]
        );
    }

    #[test]
    fn read_entries_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("darktablerc");
        std::fs::write(&path, [0xff, 0xfe, b'=', b'x']).unwrap();
        assert!(matches!(
            read_entries(&path),
            Err(ConfigError::Io { .. })
        ));
    }
}
