//! Pricing Config

use std::{path::PathBuf, time::Duration};

use clap::Args;
use patisserie_app::domain::rate_limits::RateLimitPolicy;

/// Catalog and price endpoint throttling.
#[derive(Debug, Args)]
pub struct PricingConfig {
    /// YAML rules catalog; the built-in catalog is used when omitted
    #[arg(long, env = "PRICING_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Price requests allowed per client per window
    #[arg(long, env = "RATE_LIMIT_REQUESTS", default_value_t = 100)]
    pub rate_limit_requests: u32,

    /// Rate limit window length
    #[arg(long, env = "RATE_LIMIT_WINDOW_SECONDS", default_value_t = 60)]
    pub rate_limit_window_seconds: u64,
}

impl PricingConfig {
    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy {
            max_requests: self.rate_limit_requests,
            window: Duration::from_secs(self.rate_limit_window_seconds.max(1)),
        }
    }
}
