//! Session state file storage.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::model::SessionSnapshot;
use crate::Result;
use crate::files::{remove_stray_temps, write_atomic};

/// Reads and atomically writes the session state file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store for the state file at `path`.
    ///
    /// Temporary files left behind by a crash during a previous save are
    /// removed so they cannot pile up next to the state file.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let removed = remove_stray_temps(&path);
        if removed > 0 {
            info!("Cleaned up {removed} leftover session temp files");
        }
        Self { path }
    }

    /// Location of the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the last saved snapshot.
    ///
    /// Returns `None` when there is no state file, or when it cannot be
    /// read or parsed (logged; the caller starts fresh).
    #[must_use]
    pub fn load(&self) -> Option<SessionSnapshot> {
        if !self.path.exists() {
            debug!("No session state at {}", self.path.display());
            return None;
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to read session state {}: {e}", self.path.display());
                return None;
            }
        };

        match serde_json::from_str::<SessionSnapshot>(&contents) {
            Ok(snapshot) => Some(snapshot.sanitized()),
            Err(e) => {
                warn!("Ignoring invalid session state {}: {e}", self.path.display());
                None
            }
        }
    }

    /// Write `snapshot` over the state file, atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails; the previous
    /// state file is left intact in that case.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        let contents = serde_json::to_string_pretty(snapshot)?;
        write_atomic(&self.path, contents.as_bytes())?;
        debug!(
            "Session saved: {} CVs queued, {} undoable",
            snapshot.cv_list.len(),
            snapshot.undo_stack.len()
        );
        Ok(())
    }
}
