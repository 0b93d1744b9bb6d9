//! Cart lifecycle sweeper.
//!
//! A sweep runs in two steps: active carts idle past the active timeout are
//! abandoned, then abandoned carts idle past the retention window are purged.
//! Every write is conditional on the version the sweep read, so a cart touched
//! by a request mid-sweep, or handled by an overlapping sweep, is skipped and
//! re-evaluated next time.

use std::{
    collections::HashSet,
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use jiff::Timestamp;
use tracing::{Instrument, debug, error, info, info_span, warn};
use trolley::{
    cart::{CartId, CartStatus},
    lifecycle::LifecyclePolicy,
};

use crate::domain::carts::{CartStore, StoreError};

mod schedule;

pub use schedule::SweeperHandle;

/// Counts from a single sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Carts moved from active to abandoned
    pub abandoned: usize,

    /// Abandoned carts deleted
    pub purged: usize,

    /// Carts that changed or disappeared before they could be written
    pub skipped: usize,

    /// Carts, or whole steps, that failed with a storage error
    pub failed: usize,
}

pub struct Sweeper {
    store: Arc<dyn CartStore>,
    policy: LifecyclePolicy,
}

impl Sweeper {
    #[must_use]
    pub fn new(store: Arc<dyn CartStore>, policy: LifecyclePolicy) -> Self {
        Self { store, policy }
    }

    /// Lifecycle windows this sweeper applies
    pub fn policy(&self) -> LifecyclePolicy {
        self.policy
    }

    /// Run one sweep as of `now`. Failures are logged and counted rather than
    /// returned, so one bad cart never stops the rest.
    pub async fn run_once(&self, now: Timestamp) -> SweepReport {
        let span = info_span!("sweep", %now);

        async {
            let mut report = SweepReport::default();

            let abandoned = self.abandon_stale(now, &mut report).await;

            self.purge_expired(now, &abandoned, &mut report).await;

            info!(
                abandoned = report.abandoned,
                purged = report.purged,
                skipped = report.skipped,
                failed = report.failed,
                "sweep finished"
            );

            report
        }
        .instrument(span)
        .await
    }

    async fn abandon_stale(&self, now: Timestamp, report: &mut SweepReport) -> HashSet<CartId> {
        let mut abandoned = HashSet::new();

        let candidates = match self.policy.abandon_cutoff(now) {
            Ok(cutoff) => self.store.query_carts(CartStatus::Active, cutoff).await,
            Err(error) => {
                error!(%error, "failed to compute abandon cutoff");
                report.failed += 1;
                return abandoned;
            }
        };

        let candidates = match candidates {
            Ok(candidates) => candidates,
            Err(error) => {
                error!(%error, "failed to query stale carts");
                report.failed += 1;
                return abandoned;
            }
        };

        for mut cart in candidates {
            let id = cart.id();

            if !cart.mark_abandoned() {
                report.skipped += 1;
                continue;
            }

            match self.store.persist(cart).await {
                Ok(_) => {
                    debug!(cart = %id, "cart abandoned");
                    abandoned.insert(id);
                    report.abandoned += 1;
                }
                Err(StoreError::Conflict(_) | StoreError::NotFound(_)) => {
                    debug!(cart = %id, "cart changed during sweep; skipping");
                    report.skipped += 1;
                }
                Err(error) => {
                    warn!(cart = %id, %error, "failed to abandon cart");
                    report.failed += 1;
                }
            }
        }

        abandoned
    }

    async fn purge_expired(
        &self,
        now: Timestamp,
        abandoned: &HashSet<CartId>,
        report: &mut SweepReport,
    ) {
        let candidates = match self.policy.purge_cutoff(now) {
            Ok(cutoff) => self.store.query_carts(CartStatus::Abandoned, cutoff).await,
            Err(error) => {
                error!(%error, "failed to compute purge cutoff");
                report.failed += 1;
                return;
            }
        };

        let candidates = match candidates {
            Ok(candidates) => candidates,
            Err(error) => {
                error!(%error, "failed to query expired carts");
                report.failed += 1;
                return;
            }
        };

        for cart in candidates {
            if abandoned.contains(&cart.id()) {
                continue;
            }

            let version = cart.version();

            let id = match cart.purge() {
                Ok(id) => id,
                Err(error) => {
                    warn!(%error, "refusing to purge cart");
                    report.skipped += 1;
                    continue;
                }
            };

            match self.store.delete_cart(id, version).await {
                Ok(()) => {
                    debug!(cart = %id, "cart purged");
                    report.purged += 1;
                }
                Err(StoreError::Conflict(_) | StoreError::NotFound(_)) => {
                    debug!(cart = %id, "cart changed during sweep; skipping");
                    report.skipped += 1;
                }
                Err(error) => {
                    warn!(cart = %id, %error, "failed to purge cart");
                    report.failed += 1;
                }
            }
        }
    }
}

impl Debug for Sweeper {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Sweeper")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
