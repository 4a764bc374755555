//! Draft Sync
//!
//! Debounced autosave for a single editing session. Each session owns an actor
//! task; edits are sent over a channel and the save state is published on a
//! watch channel.

mod controller;
mod errors;
pub mod mirror;
mod settings;
mod status;

pub use controller::{DraftSync, Restored, SaveOutcome};
pub use errors::SyncError;
pub use mirror::{LocalMirror, MemoryMirror, MirrorError};
pub use settings::SyncSettings;
pub use status::{SyncState, SyncStatus};
