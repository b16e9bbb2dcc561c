//! The triage state machine driven by the UI layer.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::model::HistoryEntry;
use crate::config::Config;
use crate::emails::{EmailDirectory, EmailRow, ExportRow};
use crate::files::{list_pdfs, move_file, unique_destination};
use crate::session::{SessionSnapshot, SessionStore, clamp_zoom};
use crate::undo::{Operation, UndoLedger};
use crate::{Error, Result};

/// Name of the folder (under the base folder) holding reason folders.
pub const REJECTED_DIR: &str = "Rejected";

/// Owns the queue, cursor, undo ledger and email directory of one triage
/// session and keeps them in step with the filesystem.
///
/// Every mutating operation persists a snapshot through the attached
/// [`SessionStore`], if any. Persistence failures are logged and do not
/// fail the operation.
#[derive(Debug)]
pub struct Organizer {
    config: Config,
    config_path: Option<PathBuf>,
    store: Option<SessionStore>,
    base_folder: Option<PathBuf>,
    queue: Vec<PathBuf>,
    cursor: Option<usize>,
    ledger: UndoLedger,
    emails: EmailDirectory,
    zoom: f64,
}

impl Organizer {
    /// Creates an organizer with no folder open and no persistence.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let ledger = UndoLedger::new(config.max_undo);
        let emails = EmailDirectory::new(config.email_map.clone(), Default::default());
        let zoom = clamp_zoom(config.default_zoom);
        Self {
            config,
            config_path: None,
            store: None,
            base_folder: None,
            queue: Vec::new(),
            cursor: None,
            ledger,
            emails,
            zoom,
        }
    }

    /// Write imported emails back to the configuration file at `path`.
    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Persist snapshots through `store`.
    #[must_use]
    pub fn with_session_store(mut self, store: SessionStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Restore the last snapshot saved in the attached store.
    ///
    /// Returns true if a session with an open folder was restored.
    pub fn restore_session(&mut self) -> bool {
        let Some(snapshot) = self.store.as_ref().and_then(SessionStore::load) else {
            return false;
        };
        self.restore(snapshot);
        self.base_folder.is_some()
    }

    /// Replace the in-memory state with `snapshot`.
    pub fn restore(&mut self, snapshot: SessionSnapshot) {
        let snapshot = snapshot.sanitized();
        self.cursor = snapshot.cursor();
        self.base_folder =
            Some(snapshot.base_folder).filter(|p| !p.as_os_str().is_empty());
        self.queue = snapshot.cv_list;
        self.ledger = UndoLedger::from_operations(snapshot.undo_stack, self.config.max_undo);
        self.emails.set_session(snapshot.cand_email_map);
        self.zoom = snapshot.viewer_zoom;

        if let Some(base) = &self.base_folder {
            info!(
                "Session restored: {} with {} CVs queued",
                base.display(),
                self.queue.len()
            );
        }
    }

    /// Capture the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            base_folder: self.base_folder.clone().unwrap_or_default(),
            cv_list: self.queue.clone(),
            current_index: SessionSnapshot::index_of(self.cursor),
            undo_stack: self.ledger.iter().cloned().collect(),
            cand_email_map: self.emails.session().clone(),
            viewer_zoom: self.zoom,
        }
    }

    /// Persist the current state now.
    ///
    /// Does nothing until a folder has been opened or when no store is
    /// attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn save(&self) -> Result<()> {
        match (&self.store, &self.base_folder) {
            (Some(store), Some(_)) => store.save(&self.snapshot()),
            _ => Ok(()),
        }
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!("Failed to save session state: {e}");
        }
    }

    /// Load every PDF in `folder` into a fresh queue.
    ///
    /// Resets the cursor to the first CV and clears the undo ledger.
    /// Returns the number of CVs queued.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the folder does not exist; the
    /// current session is left untouched.
    pub fn open_folder(&mut self, folder: &Path) -> Result<usize> {
        let pdfs = list_pdfs(folder)?;

        self.base_folder = Some(folder.to_path_buf());
        self.cursor = if pdfs.is_empty() { None } else { Some(0) };
        self.queue = pdfs;
        self.ledger.clear();

        info!("Opened {} with {} CVs", folder.display(), self.queue.len());
        self.persist();
        Ok(self.queue.len())
    }

    /// Reject the current CV for `reason_key`.
    ///
    /// The file goes to `<base>/Rejected/<reason folder>/`, renamed with a
    /// numeric suffix if that name is taken. Returns the new location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCurrentItem`], [`Error::UnknownReason`],
    /// [`Error::NotFound`] when the file vanished, or [`Error::Move`]. No
    /// state changes on error.
    pub fn move_current(&mut self, reason_key: char) -> Result<PathBuf> {
        let index = self.current()?;
        let folder = self
            .config
            .reason_map
            .folder(reason_key)
            .ok_or(Error::UnknownReason(reason_key))?;
        let target_dir = self.base()?.join(REJECTED_DIR).join(folder);

        self.relocate(index, &target_dir, |src, dest| {
            Operation::reject(src, dest, reason_key, index)
        })
    }

    /// Put the current CV aside in the hold folder.
    ///
    /// Returns the new location.
    ///
    /// # Errors
    ///
    /// Same as [`Organizer::move_current`], minus the reason check.
    pub fn hold_current(&mut self) -> Result<PathBuf> {
        let index = self.current()?;
        let target_dir = self.base()?.join(&self.config.hold_folder);

        self.relocate(index, &target_dir, |src, dest| Operation::hold(src, dest, index))
    }

    fn relocate(
        &mut self,
        index: usize,
        target_dir: &Path,
        record: impl FnOnce(PathBuf, PathBuf) -> Operation,
    ) -> Result<PathBuf> {
        let src = self.queue[index].clone();
        if !src.is_file() {
            return Err(Error::NotFound(src));
        }
        let filename = src
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::NotFound(src.clone()))?;

        let dest = target_dir.join(unique_destination(target_dir, &filename));
        move_file(&src, &dest)?;

        self.ledger.push(record(src, dest.clone()));
        self.queue.remove(index);
        self.cursor = if self.queue.is_empty() {
            None
        } else {
            Some(index.min(self.queue.len() - 1))
        };

        info!("Moved {filename} to {}", dest.display());
        self.persist();
        Ok(dest)
    }

    /// Reverse the most recent reject or hold.
    ///
    /// If a different file now sits at the original location,
    /// `confirm_overwrite` is asked whether to replace it. Returns the
    /// restored path, which becomes the current CV.
    ///
    /// # Errors
    ///
    /// - [`Error::Empty`] when nothing is recorded.
    /// - [`Error::Conflict`] when the moved file is gone; that operation is
    ///   dropped and the next undo works on the one before it.
    /// - [`Error::Conflict`] when the overwrite is declined; the operation
    ///   is put back so it can be undone later.
    /// - I/O or [`Error::Move`] failures; the operation is put back too.
    pub fn undo(&mut self, confirm_overwrite: impl FnOnce(&Path) -> bool) -> Result<PathBuf> {
        let op = self.ledger.pop()?;
        let src = op.source().to_path_buf();
        let dest = op.destination().to_path_buf();

        if !dest.exists() {
            warn!(
                "Cannot undo {}: {} no longer exists",
                op.filename(),
                dest.display()
            );
            self.persist();
            return Err(Error::Conflict(format!(
                "{} not found; it may have been moved or deleted outside the application",
                dest.display()
            )));
        }

        if src.exists() {
            if !confirm_overwrite(&src) {
                debug!("Overwrite of {} declined, keeping operation", src.display());
                self.ledger.push(op);
                return Err(Error::Conflict(format!(
                    "{} already exists and was not overwritten",
                    src.display()
                )));
            }
            if let Err(e) = fs::remove_file(&src) {
                self.ledger.push(op);
                return Err(e.into());
            }
        }

        if let Err(e) = move_file(&dest, &src) {
            self.ledger.push(op);
            return Err(e);
        }

        let index = match self.queue.iter().position(|p| *p == src) {
            Some(existing) => existing,
            None => {
                let index = op.position().min(self.queue.len());
                self.queue.insert(index, src.clone());
                index
            }
        };
        self.cursor = Some(index);

        info!("Undo successful: restored {}", op.filename());
        self.persist();
        Ok(src)
    }

    /// The occupied original location the next [`Organizer::undo`] would
    /// ask about, if any.
    ///
    /// Lets an asynchronous UI collect the overwrite decision before
    /// calling `undo`.
    #[must_use]
    pub fn undo_conflict(&self) -> Option<&Path> {
        let op = self.ledger.last()?;
        (op.destination().exists() && op.source().exists()).then(|| op.source())
    }

    /// Up to the last `n` recorded moves, most recent last.
    #[must_use]
    pub fn recent_history(&self, n: usize) -> Vec<HistoryEntry> {
        self.ledger
            .recent(n)
            .into_iter()
            .map(|op| HistoryEntry::describe(op, &self.config.reason_map))
            .collect()
    }

    /// Import candidate emails.
    ///
    /// Both email tiers are updated; the persistent tier is written to the
    /// configuration file when one is attached. Returns the number of
    /// entries written.
    pub fn import_emails(&mut self, rows: &[EmailRow]) -> usize {
        let written = self.emails.import(rows);
        self.sync_imported_emails();
        written
    }

    fn sync_imported_emails(&mut self) {
        self.config.email_map = self.emails.persistent().clone();

        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save(path) {
                warn!("Couldn't save imported emails to config: {e}");
            }
        }
        self.persist();
    }

    /// Parse a CSV email import and store it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the `name` or `email` header is
    /// missing, or [`Error::Csv`] for malformed input. Nothing is imported
    /// on error.
    pub fn import_emails_from<R: Read>(&mut self, input: R) -> Result<usize> {
        let written = self.emails.import_csv(input)?;
        self.sync_imported_emails();
        Ok(written)
    }

    /// List every rejected PDF on disk with its reason and email.
    ///
    /// Reason folders are visited in key order, files in name order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoFolder`] before a folder is opened, or an I/O
    /// error if a reason folder cannot be read.
    pub fn export_csv(&self) -> Result<Vec<ExportRow>> {
        let rejected = self.base()?.join(REJECTED_DIR);
        if !rejected.is_dir() {
            return Ok(Vec::new());
        }

        let mut rows = Vec::new();
        for (key, folder) in self.config.reason_map.iter() {
            let dir = rejected.join(folder);
            if !dir.is_dir() {
                continue;
            }
            for path in list_pdfs(&dir)? {
                let filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                rows.push(ExportRow {
                    filename,
                    reason_key: key,
                    reason_text: folder.to_string(),
                    email: self.emails.lookup(&stem).unwrap_or_default().to_string(),
                });
            }
        }
        Ok(rows)
    }

    /// The CV under the cursor.
    #[must_use]
    pub fn current_item(&self) -> Option<&Path> {
        self.cursor
            .and_then(|i| self.queue.get(i))
            .map(PathBuf::as_path)
    }

    /// Email known for the CV under the cursor.
    #[must_use]
    pub fn current_email(&self) -> Option<&str> {
        let stem = self.current_item()?.file_stem()?.to_string_lossy();
        self.emails.lookup(&stem)
    }

    /// One-line description of the current CV for a status bar.
    #[must_use]
    pub fn status_line(&self) -> String {
        let Some(current) = self.current_item() else {
            return "No CVs loaded".to_string();
        };
        let name = current
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match self.current_email() {
            Some(email) => format!("Evaluating: {name} | Email: {email}"),
            None => format!("Evaluating: {name}"),
        }
    }

    /// Number of CVs still pending.
    #[must_use]
    pub fn queue_length(&self) -> usize {
        self.queue.len()
    }

    /// Pending CVs in queue order.
    #[must_use]
    pub fn queue(&self) -> &[PathBuf] {
        &self.queue
    }

    /// Cursor into the queue, `None` when it is empty.
    #[must_use]
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Folder the queue was listed from.
    #[must_use]
    pub fn base_folder(&self) -> Option<&Path> {
        self.base_folder.as_deref()
    }

    /// Recorded undoable moves.
    #[must_use]
    pub const fn ledger(&self) -> &UndoLedger {
        &self.ledger
    }

    /// Candidate email directory.
    #[must_use]
    pub const fn emails(&self) -> &EmailDirectory {
        &self.emails
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Viewer zoom factor kept with the session.
    #[must_use]
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the viewer zoom, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
        self.persist();
    }

    fn current(&self) -> Result<usize> {
        self.cursor
            .filter(|&i| i < self.queue.len())
            .ok_or(Error::NoCurrentItem)
    }

    fn base(&self) -> Result<&Path> {
        self.base_folder.as_deref().ok_or(Error::NoFolder)
    }
}
