use std::time::Duration;

/// Timing for a sync session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    /// Quiet period after the last edit before saving.
    pub debounce: Duration,

    /// Upper bound on a single persistence call.
    pub save_timeout: Duration,

    /// Commands buffered before `edit` waits.
    pub command_buffer: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(30),
            save_timeout: Duration::from_secs(10),
            command_buffer: 32,
        }
    }
}
