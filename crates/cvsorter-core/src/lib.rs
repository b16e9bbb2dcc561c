//! # cvsorter-core
//!
//! Core business logic for `cvsorter`, a keyboard-driven CV triage tool.
//!
//! This crate provides:
//! - **File store** - PDF listing, collision-free destination names, moves
//! - **Name normalization** - canonical candidate keys for email matching
//! - **Email directory** - persistent and session-only name to email tiers
//! - **Undo ledger** - bounded history of reversible reject/hold moves
//! - **Session state** - atomic snapshot persistence that survives restarts
//! - **Organizer** - the triage state machine the UI layer drives
//!
//! The crate is synchronous and single-threaded:
//! every operation runs to completion before the next one starts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod emails;
mod error;
pub mod files;
pub mod names;
pub mod session;
pub mod triage;
pub mod undo;

pub use config::{Config, ReasonMap};
pub use emails::{EmailDirectory, EmailRow, ExportRow, read_email_rows, write_export};
pub use error::{Error, ErrorKind, Result};
pub use names::normalize;
pub use session::{SessionSnapshot, SessionStore};
pub use triage::{HistoryEntry, Organizer, REJECTED_DIR};
pub use undo::{Operation, OperationKind, UndoLedger};
