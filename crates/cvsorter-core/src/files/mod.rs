//! Filesystem-facing operations: PDF listing, destination naming, moves and
//! atomic file replacement.

mod atomic;
mod store;

pub use atomic::{remove_stray_temps, write_atomic};
pub use store::{is_pdf, list_pdfs, move_file, unique_destination};
