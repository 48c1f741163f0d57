//! Atomic file output shared by both exporters.
//!
//! Content is written to a temporary file next to the destination, synced,
//! then moved over the destination in one rename. On any failure the
//! temporary file is removed when it drops and the destination is left as
//! it was.
//!
//! The renamed file keeps the permissions of the file it replaces. A new
//! file gets the same mode a plain create would give it (0666 minus umask).

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{ExportError, ExportResult};

/// Write `bytes` to `path`, replacing any existing file atomically.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> ExportResult<()> {
    let io_error = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    // Same directory as the target so the final rename never crosses filesystems
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_error)?;

    let mut temp = temp_file_in(dir).map_err(io_error)?;
    temp.write_all(bytes).map_err(io_error)?;
    temp.flush().map_err(io_error)?;

    if let Ok(existing) = fs::metadata(path) {
        if existing.is_file() {
            temp.as_file()
                .set_permissions(existing.permissions())
                .map_err(io_error)?;
        }
    }
    temp.as_file().sync_all().map_err(io_error)?;

    temp.persist(path).map_err(|e| ExportError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}

/// Mode requested for new files; the process umask still applies.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o666;

// tempfile defaults to 0600, which would leak into the renamed output
#[allow(unused_mut)]
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(NEW_FILE_MODE));
    }
    builder.tempfile_in(dir)
}
