//! Text rendering for the terminal front end.

use std::fmt::Write as _;

use cvsorter_core::{ErrorKind, HistoryEntry, Organizer, ReasonMap};

/// Number of history entries shown by the `history` command.
pub const HISTORY_LEN: usize = 10;

/// Status line with queue position, e.g. `[2/7] Evaluating: jane.pdf`.
pub fn status(organizer: &Organizer) -> String {
    match organizer.cursor() {
        Some(index) if organizer.queue_length() > 0 => format!(
            "[{}/{}] {}",
            index + 1,
            organizer.queue_length(),
            organizer.status_line()
        ),
        _ => organizer.status_line(),
    }
}

/// Numbered history listing, oldest first.
pub fn history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No moves yet.".to_string();
    }

    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {}: {} ({})",
            i + 1,
            entry.label(),
            entry.filename,
            entry.recorded_at.format("%H:%M:%S")
        );
        let _ = writeln!(out, "   Reason: {}", entry.reason);
    }
    out.truncate(out.trim_end().len());
    out
}

/// Key reference.
pub fn help(reasons: &ReasonMap) -> String {
    let mut out = String::from("Reason keys:\n");
    for (key, folder) in reasons.iter() {
        let _ = writeln!(out, "  {key}  reject: {folder}");
    }
    out.push_str(
        "Commands:\n\
         \x20 h, hold          hold for review\n\
         \x20 u, undo          undo the last move\n\
         \x20 history          show recent moves\n\
         \x20 open <folder>    load the PDFs in a folder\n\
         \x20 import <file>    import candidate emails (name,email CSV)\n\
         \x20 export <file>    export rejected CVs to CSV\n\
         \x20 zoom <factor>    set the viewer zoom (0.5 to 3.0)\n\
         \x20 s, status        show the current CV\n\
         \x20 q, quit          save and exit",
    );
    out
}

/// Short heading for an error shown to the user.
pub const fn error_title(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotFound => "File Missing",
        ErrorKind::Format => "Invalid Input",
        ErrorKind::Move => "Move Failed",
        ErrorKind::Empty => "Nothing to undo",
        ErrorKind::Conflict => "Undo Conflict",
        ErrorKind::Invalid => "Invalid Action",
        ErrorKind::Other => "Error",
    }
}
