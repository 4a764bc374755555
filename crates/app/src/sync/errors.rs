use std::time::Duration;

use thiserror::Error;

use crate::domain::drafts::DraftsServiceError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to save draft")]
    Storage(#[from] DraftsServiceError),

    #[error("draft save timed out after {0:?}")]
    Timeout(Duration),

    #[error("sync session has stopped")]
    Closed,
}
