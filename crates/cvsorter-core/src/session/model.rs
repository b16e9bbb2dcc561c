//! Session snapshot model.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::undo::Operation;

/// Smallest viewer zoom kept in a session.
pub const MIN_ZOOM: f64 = 0.5;
/// Largest viewer zoom kept in a session.
pub const MAX_ZOOM: f64 = 3.0;

const DEFAULT_ZOOM: f64 = 1.5;

/// Clamp a zoom factor into `[MIN_ZOOM, MAX_ZOOM]`.
#[must_use]
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        DEFAULT_ZOOM
    } else {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    }
}

const fn no_index() -> i64 {
    -1
}

const fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}

/// Serializable triage state.
///
/// Field names are the on-disk format. `current_index` is `-1` when the
/// queue is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Folder the queue was listed from.
    #[serde(default)]
    pub base_folder: PathBuf,
    /// Remaining CVs, in queue order.
    #[serde(default)]
    pub cv_list: Vec<PathBuf>,
    /// Cursor into `cv_list`, or -1.
    #[serde(default = "no_index")]
    pub current_index: i64,
    /// Undo ledger, oldest first.
    #[serde(default)]
    pub undo_stack: Vec<Operation>,
    /// Session tier of the email directory.
    #[serde(default)]
    pub cand_email_map: BTreeMap<String, String>,
    /// Viewer zoom factor.
    #[serde(default = "default_zoom")]
    pub viewer_zoom: f64,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            base_folder: PathBuf::new(),
            cv_list: Vec::new(),
            current_index: no_index(),
            undo_stack: Vec::new(),
            cand_email_map: BTreeMap::new(),
            viewer_zoom: DEFAULT_ZOOM,
        }
    }
}

impl SessionSnapshot {
    /// Convert a cursor into the on-disk index.
    #[must_use]
    pub fn index_of(cursor: Option<usize>) -> i64 {
        cursor
            .and_then(|c| i64::try_from(c).ok())
            .unwrap_or_else(no_index)
    }

    /// Repair a snapshot read from disk.
    ///
    /// Drops duplicate queue entries (first wins), clamps the cursor to the
    /// last entry (or -1 when empty) and clamps the zoom.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let mut seen = HashSet::new();
        self.cv_list.retain(|p| seen.insert(p.clone()));

        let len = i64::try_from(self.cv_list.len()).unwrap_or(i64::MAX);
        self.current_index = if len == 0 {
            -1
        } else {
            self.current_index.clamp(0, len - 1)
        };

        self.viewer_zoom = clamp_zoom(self.viewer_zoom);
        self
    }

    /// Cursor as a queue index, `None` when the queue is empty.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        usize::try_from(self.current_index)
            .ok()
            .filter(|&i| i < self.cv_list.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn snapshot(paths: &[&str], index: i64) -> SessionSnapshot {
        SessionSnapshot {
            base_folder: "/cv".into(),
            cv_list: paths.iter().map(PathBuf::from).collect(),
            current_index: index,
            ..SessionSnapshot::default()
        }
    }

    #[test]
    fn test_sanitized_clamps_cursor() {
        let s = snapshot(&["/cv/a.pdf", "/cv/b.pdf"], 7).sanitized();
        assert_eq!(s.current_index, 1);
        assert_eq!(s.cursor(), Some(1));
    }

    #[test]
    fn test_sanitized_empty_queue() {
        let s = snapshot(&[], 3).sanitized();
        assert_eq!(s.current_index, -1);
        assert_eq!(s.cursor(), None);
    }

    #[test]
    fn test_sanitized_drops_duplicates() {
        let s = snapshot(&["/cv/a.pdf", "/cv/b.pdf", "/cv/a.pdf"], 0).sanitized();
        assert_eq!(s.cv_list, vec![PathBuf::from("/cv/a.pdf"), PathBuf::from("/cv/b.pdf")]);
    }

    #[test]
    fn test_sanitized_clamps_zoom() {
        let mut s = snapshot(&[], -1);
        s.viewer_zoom = 9.0;
        assert_eq!(s.sanitized().viewer_zoom, MAX_ZOOM);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let s: SessionSnapshot = serde_json::from_str(r#"{"base_folder": "/cv"}"#).unwrap();
        assert_eq!(s.current_index, -1);
        assert!(s.undo_stack.is_empty());
        assert_eq!(s.viewer_zoom, 1.5);
    }

    #[test]
    fn test_index_of() {
        assert_eq!(SessionSnapshot::index_of(None), -1);
        assert_eq!(SessionSnapshot::index_of(Some(4)), 4);
    }
}
