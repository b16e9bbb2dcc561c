//! Triage display models.

use chrono::{DateTime, Utc};

use crate::config::ReasonMap;
use crate::undo::{Operation, OperationKind};

/// One line of the undo history shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Kind of move.
    pub kind: OperationKind,
    /// File name that was moved.
    pub filename: String,
    /// Reason folder for rejections, "Review" for holds.
    pub reason: String,
    /// When the move happened.
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Describe `op` using the configured reasons.
    ///
    /// A reason key that is no longer configured is shown as-is.
    #[must_use]
    pub fn describe(op: &Operation, reasons: &ReasonMap) -> Self {
        let reason = match (op.kind(), op.reason()) {
            (OperationKind::Reject, Some(key)) => reasons
                .folder(key)
                .map_or_else(|| key.to_string(), ToString::to_string),
            (OperationKind::Reject, None) => String::new(),
            (OperationKind::Hold, _) => "Review".to_string(),
        };
        Self {
            kind: op.kind(),
            filename: op.filename().to_string(),
            reason,
            recorded_at: op.recorded_at(),
        }
    }

    /// "Rejected" or "Held".
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.kind.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_reject_uses_folder_name() {
        let op = Operation::reject("/cv/a.pdf".into(), "/cv/Rejected/Other/a.pdf".into(), '3', 0);
        let entry = HistoryEntry::describe(&op, &ReasonMap::default());

        assert_eq!(entry.label(), "Rejected");
        assert_eq!(entry.reason, "Other");
        assert_eq!(entry.filename, "a.pdf");
    }

    #[test]
    fn test_describe_unknown_reason_key() {
        let op = Operation::reject("/cv/a.pdf".into(), "/cv/Rejected/Gone/a.pdf".into(), 'z', 0);
        let entry = HistoryEntry::describe(&op, &ReasonMap::default());

        assert_eq!(entry.reason, "z");
    }

    #[test]
    fn test_describe_hold() {
        let op = Operation::hold("/cv/a.pdf".into(), "/cv/HoldForReview/a.pdf".into(), 0);
        let entry = HistoryEntry::describe(&op, &ReasonMap::default());

        assert_eq!(entry.label(), "Held");
        assert_eq!(entry.reason, "Review");
    }
}
