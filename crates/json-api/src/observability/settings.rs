//! Request logging settings, fixed at startup.

use std::{sync::OnceLock, time::Duration};

use crate::config::ServerConfig;

const DEFAULT_SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(1);

static SLOW_REQUEST_THRESHOLD: OnceLock<Duration> = OnceLock::new();

/// First call wins.
pub(super) fn apply_runtime_config(config: &ServerConfig) {
    _ = SLOW_REQUEST_THRESHOLD.set(config.logging.slow_request_threshold());
}

pub(super) fn slow_request_threshold() -> Duration {
    SLOW_REQUEST_THRESHOLD
        .get()
        .copied()
        .unwrap_or(DEFAULT_SLOW_REQUEST_THRESHOLD)
}
