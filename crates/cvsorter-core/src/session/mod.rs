//! Session persistence.
//!
//! The whole triage state (folder, queue, cursor, undo ledger, session email
//! tier, viewer zoom) is captured in a [`SessionSnapshot`] and written by a
//! [`SessionStore`] after every change, so a restart picks up where the
//! previous run stopped.

mod model;
mod repository;

pub use model::{MAX_ZOOM, MIN_ZOOM, SessionSnapshot, clamp_zoom};
pub use repository::SessionStore;
