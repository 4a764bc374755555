//! Single-instance rate limit store.

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::{sync::Mutex, time::Instant};
use tracing::debug;

use crate::domain::rate_limits::{RateLimitDecision, RateLimitPolicy, RateLimitStore};

/// Expired windows are swept once the table grows past this many keys.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    resets_at: Instant,
    count: u32,
}

#[derive(Debug, Default)]
pub struct MemoryRateLimitStore {
    policy: RateLimitPolicy,
    windows: Mutex<FxHashMap<String, Window>>,
}

impl MemoryRateLimitStore {
    #[must_use]
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            windows: Mutex::default(),
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn hit(&self, key: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        if windows.len() > SWEEP_THRESHOLD {
            let before = windows.len();

            windows.retain(|_, window| window.resets_at > now);

            debug!(swept = before - windows.len(), "swept expired rate limit windows");
        }

        let window = windows
            .entry(key.to_string())
            .and_modify(|window| {
                if now >= window.resets_at {
                    *window = Window {
                        resets_at: now + self.policy.window,
                        count: 0,
                    };
                }
            })
            .or_insert(Window {
                resets_at: now + self.policy.window,
                count: 0,
            });

        if window.count >= self.policy.max_requests {
            return RateLimitDecision::Limited {
                retry_after: window.resets_at.saturating_duration_since(now),
            };
        }

        window.count += 1;

        RateLimitDecision::Allowed {
            remaining: self.policy.max_requests - window.count,
        }
    }
}
