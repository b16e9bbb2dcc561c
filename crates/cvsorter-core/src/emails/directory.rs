//! Two-tier name to email mapping.

use std::collections::BTreeMap;
use std::io::Read;

use tracing::info;

use super::csv_io::{EmailRow, read_email_rows};
use crate::Result;
use crate::names::normalize;

/// Normalized candidate name to email address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailDirectory {
    persistent: BTreeMap<String, String>,
    session: BTreeMap<String, String>,
}

impl EmailDirectory {
    /// Creates a directory from stored tiers.
    #[must_use]
    pub const fn new(persistent: BTreeMap<String, String>, session: BTreeMap<String, String>) -> Self {
        Self {
            persistent,
            session,
        }
    }

    /// Store every row with a non-blank name and email in both tiers.
    ///
    /// Keys are normalized names; on collision the later row wins. Returns
    /// the number of entries written.
    pub fn import(&mut self, rows: &[EmailRow]) -> usize {
        let mut written = 0;
        for row in rows {
            let key = normalize(&row.name);
            let email = row.email.trim();
            if key.is_empty() || email.is_empty() {
                continue;
            }
            self.session.insert(key.clone(), email.to_string());
            self.persistent.insert(key, email.to_string());
            written += 1;
        }
        info!(
            "Imported {written} email addresses, {} known in total",
            self.persistent.len()
        );
        written
    }

    /// Parse a CSV email import and store it.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV lacks `name`/`email` headers or is
    /// malformed; nothing is stored in that case.
    pub fn import_csv<R: Read>(&mut self, input: R) -> Result<usize> {
        let rows = read_email_rows(input)?;
        Ok(self.import(&rows))
    }

    /// Email for a PDF filename stem.
    ///
    /// The stem is normalized the same way imported names are, then the
    /// session tier is consulted before the persistent tier.
    #[must_use]
    pub fn lookup(&self, filename_stem: &str) -> Option<&str> {
        let key = normalize(filename_stem);
        self.session
            .get(&key)
            .or_else(|| self.persistent.get(&key))
            .map(String::as_str)
    }

    /// Entries that survive restarts through the configuration file.
    #[must_use]
    pub const fn persistent(&self) -> &BTreeMap<String, String> {
        &self.persistent
    }

    /// Entries kept in the session snapshot.
    #[must_use]
    pub const fn session(&self) -> &BTreeMap<String, String> {
        &self.session
    }

    /// Replace the session tier, keeping the persistent one.
    pub fn set_session(&mut self, session: BTreeMap<String, String>) {
        self.session = session;
    }
}
