//! Bounded undo stack.

use std::collections::VecDeque;

use tracing::debug;

use super::model::Operation;
use crate::{Error, Result};

/// Bounded history of reversible moves.
///
/// Pops from the newest end; evicts from the oldest end once more than
/// `max` operations are held.
#[derive(Debug, Clone, Default)]
pub struct UndoLedger {
    operations: VecDeque<Operation>,
    max: usize,
}

impl UndoLedger {
    /// Creates an empty ledger holding at most `max` operations.
    #[must_use]
    pub const fn new(max: usize) -> Self {
        Self {
            operations: VecDeque::new(),
            max,
        }
    }

    /// Rebuilds a ledger from stored operations, oldest first.
    ///
    /// Operations beyond capacity are dropped from the oldest end.
    #[must_use]
    pub fn from_operations(operations: Vec<Operation>, max: usize) -> Self {
        let mut ledger = Self::new(max);
        for op in operations {
            ledger.push(op);
        }
        ledger
    }

    /// Append an operation, returning the evicted oldest one if the ledger
    /// went over capacity.
    pub fn push(&mut self, operation: Operation) -> Option<Operation> {
        self.operations.push_back(operation);
        if self.operations.len() > self.max {
            let evicted = self.operations.pop_front();
            if let Some(op) = &evicted {
                debug!("Undo ledger full, dropping {}", op.filename());
            }
            evicted
        } else {
            None
        }
    }

    /// Remove and return the most recent operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if nothing is recorded.
    pub fn pop(&mut self) -> Result<Operation> {
        self.operations.pop_back().ok_or(Error::Empty)
    }

    /// The operation the next `pop` would return.
    #[must_use]
    pub fn last(&self) -> Option<&Operation> {
        self.operations.back()
    }

    /// Up to the last `n` operations, most recent last.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<&Operation> {
        let skip = self.operations.len().saturating_sub(n);
        self.operations.iter().skip(skip).collect()
    }

    /// All operations, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    /// Number of recorded operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true if nothing can be undone.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Capacity.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }

    /// Forget every recorded operation.
    pub fn clear(&mut self) {
        self.operations.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn op(n: usize) -> Operation {
        Operation::hold(
            format!("/cv/{n}.pdf").into(),
            format!("/cv/Hold/{n}.pdf").into(),
            n,
        )
    }

    #[test]
    fn test_pop_is_lifo() {
        let mut ledger = UndoLedger::new(10);
        ledger.push(op(1));
        ledger.push(op(2));

        assert_eq!(ledger.last().unwrap().position(), 2);
        assert_eq!(ledger.pop().unwrap().position(), 2);
        assert_eq!(ledger.pop().unwrap().position(), 1);
    }

    #[test]
    fn test_pop_empty() {
        let mut ledger = UndoLedger::new(10);
        assert!(matches!(ledger.pop(), Err(Error::Empty)));
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut ledger = UndoLedger::new(3);
        for n in 0..3 {
            assert!(ledger.push(op(n)).is_none());
        }

        let evicted = ledger.push(op(3)).unwrap();
        assert_eq!(evicted.position(), 0);
        assert_eq!(ledger.len(), 3);
        let positions: Vec<usize> = ledger.iter().map(Operation::position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn test_recent_is_most_recent_last() {
        let mut ledger = UndoLedger::new(10);
        for n in 0..5 {
            ledger.push(op(n));
        }

        let recent: Vec<usize> = ledger.recent(2).into_iter().map(Operation::position).collect();
        assert_eq!(recent, vec![3, 4]);
        assert_eq!(ledger.recent(50).len(), 5);
        assert_eq!(ledger.len(), 5);
    }

    #[test]
    fn test_from_operations_respects_capacity() {
        let ledger = UndoLedger::from_operations((0..5).map(op).collect(), 2);
        let positions: Vec<usize> = ledger.iter().map(Operation::position).collect();
        assert_eq!(positions, vec![3, 4]);
    }

    proptest! {
        #[test]
        fn prop_ledger_keeps_newest_max(max in 1usize..20, pushes in 0usize..60) {
            let mut ledger = UndoLedger::new(max);
            for n in 0..pushes {
                ledger.push(op(n));
            }

            prop_assert_eq!(ledger.len(), pushes.min(max));
            if pushes > max {
                prop_assert_eq!(ledger.iter().next().map(Operation::position), Some(pushes - max));
            }
        }
    }
}
