//! Crash-safe file replacement.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, warn};

use crate::Result;

const TEMP_SUFFIX: &str = ".tmp";

fn temp_prefix(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(".{name}.")
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Replace `path` with `contents` without ever exposing a partial file.
///
/// Writes a temporary sibling (`.<name>.XXXXXX.tmp`), syncs it, then renames
/// it over `path`. The temporary file is removed if anything fails before
/// the rename.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created or the temporary
/// file cannot be written or renamed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = parent_dir(path);
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(&temp_prefix(path))
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Remove temporary files left behind by an interrupted [`write_atomic`]
/// on `path`. Returns how many were removed.
pub fn remove_stray_temps(path: &Path) -> usize {
    let prefix = temp_prefix(path);
    let Ok(entries) = fs::read_dir(parent_dir(path)) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !(name.starts_with(&prefix) && name.ends_with(TEMP_SUFFIX)) {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) => warn!("Failed to remove stray temp file {name}: {e}"),
        }
    }

    if removed > 0 {
        debug!("Removed {removed} stray temp files for {}", path.display());
    }
    removed
}
