//! CSV import of candidate emails and export of rejection rows.

use std::io::{Read, Write};

use crate::{Error, Result};

/// Column order of the rejection export.
pub const EXPORT_HEADERS: [&str; 4] = ["Filename", "ReasonKey", "ReasonText", "Email"];

/// One `name,email` row of an email import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRow {
    /// Candidate name as written in the spreadsheet.
    pub name: String,
    /// Candidate email address.
    pub email: String,
}

impl EmailRow {
    /// Creates a new row.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// One rejected CV found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    /// File name inside the reason folder.
    pub filename: String,
    /// Reason key the folder belongs to.
    pub reason_key: char,
    /// Reason folder name.
    pub reason_text: String,
    /// Candidate email, empty when unknown.
    pub email: String,
}

/// Parse an email import.
///
/// The header row must contain `name` and `email`; other columns are
/// ignored. Every record is parsed before anything is returned, so a
/// malformed file never leads to a partial import.
///
/// # Errors
///
/// Returns [`Error::Format`] if a required header is missing, or
/// [`Error::Csv`] if the input is not valid CSV.
pub fn read_email_rows<R: Read>(input: R) -> Result<Vec<EmailRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let column = |wanted: &str| {
        headers
            .iter()
            .position(|h| h == wanted)
            .ok_or_else(|| Error::Format("CSV must contain 'name' and 'email' columns".to_string()))
    };
    let name_idx = column("name")?;
    let email_idx = column("email")?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(EmailRow {
            name: record.get(name_idx).unwrap_or_default().to_string(),
            email: record.get(email_idx).unwrap_or_default().to_string(),
        });
    }
    Ok(rows)
}

/// Write rejection rows as CSV with [`EXPORT_HEADERS`].
///
/// # Errors
///
/// Returns an error if writing to `output` fails.
pub fn write_export<W: Write>(rows: &[ExportRow], output: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(EXPORT_HEADERS)?;
    for row in rows {
        writer.write_record([
            row.filename.as_str(),
            row.reason_key.to_string().as_str(),
            row.reason_text.as_str(),
            row.email.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
