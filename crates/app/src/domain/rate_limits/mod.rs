//! Rate Limits
//!
//! Fixed-window request counters keyed by client identity.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;

mod memory;

pub use memory::MemoryRateLimitStore;

/// Requests allowed per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    /// 100 requests per minute.
    pub const STANDARD: Self = Self {
        max_requests: 100,
        window: Duration::from_secs(60),
    };
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Outcome of counting a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Request admitted.
    Allowed {
        /// Requests left in the current window.
        remaining: u32,
    },

    /// Window exhausted.
    Limited {
        /// Time until the window resets.
        retry_after: Duration,
    },
}

impl RateLimitDecision {
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

#[automock]
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Count a request for `key` and decide whether it may proceed.
    async fn hit(&self, key: &str) -> RateLimitDecision;
}
