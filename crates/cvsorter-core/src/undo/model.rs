//! Undo operation model.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a recorded move did to the CV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Moved under `Rejected/<reason folder>`.
    Reject,
    /// Moved into the hold folder.
    Hold,
}

impl OperationKind {
    /// Human-readable label for history listings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reject => "Rejected",
            Self::Hold => "Held",
        }
    }
}

/// A reversible file move.
///
/// Fields are private: an operation is never edited after it is recorded.
/// The serialized field names are part of the session file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "src")]
    source: PathBuf,
    #[serde(rename = "dest")]
    destination: PathBuf,
    #[serde(rename = "type")]
    kind: OperationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<char>,
    filename: String,
    position: usize,
    #[serde(default = "Utc::now")]
    recorded_at: DateTime<Utc>,
}

impl Operation {
    /// Record a rejection under `reason`.
    #[must_use]
    pub fn reject(source: PathBuf, destination: PathBuf, reason: char, position: usize) -> Self {
        Self::new(source, destination, OperationKind::Reject, Some(reason), position)
    }

    /// Record a hold.
    #[must_use]
    pub fn hold(source: PathBuf, destination: PathBuf, position: usize) -> Self {
        Self::new(source, destination, OperationKind::Hold, None, position)
    }

    fn new(
        source: PathBuf,
        destination: PathBuf,
        kind: OperationKind,
        reason: Option<char>,
        position: usize,
    ) -> Self {
        let filename = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            source,
            destination,
            kind,
            reason,
            filename,
            position,
            recorded_at: Utc::now(),
        }
    }

    /// Original location of the file.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Where the file was moved to.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Reject or hold.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Reason key, present only for rejections.
    #[must_use]
    pub const fn reason(&self) -> Option<char> {
        self.reason
    }

    /// Original filename, before any collision suffix.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Queue index the file occupied when it was moved.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// When the move happened.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_carries_reason() {
        let op = Operation::reject("/cv/a.pdf".into(), "/cv/Rejected/Other/a.pdf".into(), '3', 0);

        assert_eq!(op.kind(), OperationKind::Reject);
        assert_eq!(op.reason(), Some('3'));
        assert_eq!(op.filename(), "a.pdf");
    }

    #[test]
    fn test_hold_has_no_reason() {
        let op = Operation::hold("/cv/b.pdf".into(), "/cv/HoldForReview/b.pdf".into(), 4);

        assert_eq!(op.kind(), OperationKind::Hold);
        assert_eq!(op.reason(), None);
        assert_eq!(op.position(), 4);
    }

    #[test]
    fn test_session_file_shape() {
        let op = Operation::hold("/cv/b.pdf".into(), "/cv/Hold/b.pdf".into(), 1);
        let json = serde_json::to_value(&op).unwrap();

        assert_eq!(json["src"], "/cv/b.pdf");
        assert_eq!(json["dest"], "/cv/Hold/b.pdf");
        assert_eq!(json["type"], "hold");
        assert!(json.get("reason").is_none());
        assert_eq!(json["position"], 1);
    }

    #[test]
    fn test_deserialize_without_timestamp() {
        let json = r#"{"src":"/cv/a.pdf","dest":"/cv/Rejected/Other/a.pdf",
            "type":"reject","reason":"3","filename":"a.pdf","position":2}"#;

        let op: Operation = serde_json::from_str(json).unwrap();
        assert_eq!(op.reason(), Some('3'));
        assert_eq!(op.position(), 2);
    }
}
