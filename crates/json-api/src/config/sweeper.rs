//! Lifecycle Sweeper Config

use std::time::Duration;

use clap::Args;
use jiff::SignedDuration;
use trolley::lifecycle::LifecyclePolicy;

/// Lifecycle sweeper settings.
#[derive(Debug, Args)]
pub struct SweeperConfig {
    /// Seconds between sweeps
    #[arg(
        long,
        env = "SWEEP_INTERVAL_SECONDS",
        default_value_t = 3600,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub sweep_interval_seconds: u64,

    /// Minutes of inactivity before an active cart is abandoned
    #[arg(
        long,
        env = "CART_ACTIVE_TIMEOUT_MINUTES",
        default_value_t = 180,
        value_parser = clap::value_parser!(i64).range(1..=525_600)
    )]
    pub active_timeout_minutes: i64,

    /// Hours an abandoned cart is kept before it is purged
    #[arg(
        long,
        env = "CART_ABANDONED_RETENTION_HOURS",
        default_value_t = 168,
        value_parser = clap::value_parser!(i64).range(1..=87_600)
    )]
    pub abandoned_retention_hours: i64,
}

impl SweeperConfig {
    /// Time between sweeps.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }

    /// Lifecycle windows for the sweeper.
    #[must_use]
    pub fn policy(&self) -> LifecyclePolicy {
        LifecyclePolicy::new(
            SignedDuration::from_mins(self.active_timeout_minutes),
            SignedDuration::from_hours(self.abandoned_retention_hours),
        )
    }
}
