//! File-system helpers shared by the safe writer.
use std::io::Read;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::WriteError;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<(), WriteError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| WriteError::Io {
            action: "create directory",
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Create a temporary file next to `dest` filled from `src`.
///
/// The file lives in the destination's directory so that
/// [`persist`] can rename it into place.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written.
pub fn stage_temp(dest: &Path, mut src: impl Read) -> Result<NamedTempFile, WriteError> {
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let io_err = |source: std::io::Error| WriteError::Io {
        action: "write temporary file in",
        path: dir.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    std::io::copy(&mut src, &mut tmp).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    Ok(tmp)
}

/// Move `tmp` over `dest`.
///
/// Uses an atomic rename; if that fails (e.g. across filesystems) the
/// temporary file is copied instead and then removed.
///
/// # Errors
///
/// Returns an error if neither the rename nor the copy succeeds.
pub fn persist(tmp: NamedTempFile, dest: &Path) -> Result<(), WriteError> {
    if let Err(e) = tmp.persist(dest) {
        std::fs::copy(e.file.path(), dest).map_err(|source| WriteError::Io {
            action: "replace",
            path: dest.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
