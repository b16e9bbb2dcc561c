//! Undo support for triage moves.
//!
//! Every reject or hold records an [`Operation`] holding enough information
//! to put the file back where it was, including its position in the queue.
//! Operations live in an [`UndoLedger`]:
//!
//! - `push` appends the newest operation and evicts the oldest once the
//!   ledger is over capacity, so very old moves become permanent
//! - `pop` hands back the newest operation (stack order)
//! - `recent` shows the tail of the ledger without changing it

mod ledger;
mod model;

pub use ledger::UndoLedger;
pub use model::{Operation, OperationKind};
