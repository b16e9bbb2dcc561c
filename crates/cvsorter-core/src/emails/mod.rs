//! Candidate email directory and the CSV formats around it.
//!
//! Emails are imported from a spreadsheet export keyed by candidate name and
//! matched against PDF filename stems through [`crate::normalize`]. The
//! directory has two tiers:
//! - **Persistent**: stored in the configuration file, survives restarts
//! - **Session**: stored in the session snapshot, consulted first
//!
//! An import writes both tiers.

mod csv_io;
mod directory;

pub use csv_io::{EXPORT_HEADERS, EmailRow, ExportRow, read_email_rows, write_export};
pub use directory::EmailDirectory;
