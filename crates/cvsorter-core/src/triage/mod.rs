//! CV triage workflow.
//!
//! Every CV starts **pending** in the queue. The user either rejects it
//! with a reason (moved to `Rejected/<reason folder>`) or holds it (moved to
//! the hold folder); both record an undo operation. Undo brings the file
//! back and reinserts it where it was, making it pending again.
//!
//! # Example
//!
//! ```ignore
//! use cvsorter_core::{Config, Organizer};
//!
//! let mut organizer = Organizer::new(Config::default());
//! organizer.open_folder(Path::new("/home/hr/applicants"))?;
//!
//! organizer.move_current('1')?; // reject: unsatisfactory education
//! organizer.hold_current()?;
//! organizer.undo(|_occupied| false)?;
//!
//! println!("{}", organizer.status_line());
//! ```

mod model;
mod organizer;

pub use model::HistoryEntry;
pub use organizer::{Organizer, REJECTED_DIR};
