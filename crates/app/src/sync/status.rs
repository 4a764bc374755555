use jiff::Timestamp;

use crate::domain::drafts::models::DraftUuid;

/// Where the session is in the save cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Nothing waiting to be saved.
    #[default]
    Idle,

    /// An edit is waiting for the debounce to elapse.
    PendingSave,

    /// A save is in flight.
    Saving,
}

/// Snapshot published after every state change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncStatus {
    pub state: SyncState,

    /// Server draft the session writes to, once known.
    pub draft: Option<DraftUuid>,
    pub last_saved_at: Option<Timestamp>,

    /// Message of the most recent failed save, cleared on success.
    pub last_error: Option<String>,
}
