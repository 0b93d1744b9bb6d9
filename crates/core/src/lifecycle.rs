//! Inactivity lifecycle

use jiff::{SignedDuration, Timestamp};
use thiserror::Error;

use crate::cart::{Cart, CartStatus};

/// Returned when a cutoff falls outside the supported time range.
#[derive(Debug, Error)]
#[error("cannot go back {window:?} from {now}")]
pub struct LifecycleError {
    now: Timestamp,
    window: SignedDuration,

    #[source]
    source: jiff::Error,
}

/// How long carts stay active, and how long abandoned carts are kept.
///
/// Both windows are measured from `last_interaction_at`; the comparisons are
/// strict, so a cart exactly on the boundary is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicy {
    active_timeout: SignedDuration,
    abandoned_retention: SignedDuration,
}

impl LifecyclePolicy {
    /// Active carts idle for longer than this are abandoned.
    pub const DEFAULT_ACTIVE_TIMEOUT: SignedDuration = SignedDuration::from_hours(3);

    /// Abandoned carts idle for longer than this are purged.
    pub const DEFAULT_ABANDONED_RETENTION: SignedDuration = SignedDuration::from_hours(7 * 24);

    /// Create a policy with custom windows.
    pub const fn new(active_timeout: SignedDuration, abandoned_retention: SignedDuration) -> Self {
        Self {
            active_timeout,
            abandoned_retention,
        }
    }

    /// Active timeout window
    pub const fn active_timeout(&self) -> SignedDuration {
        self.active_timeout
    }

    /// Abandoned retention window
    pub const fn abandoned_retention(&self) -> SignedDuration {
        self.abandoned_retention
    }

    /// Active carts last touched strictly before this instant are stale.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] if the cutoff is out of range.
    pub fn abandon_cutoff(&self, now: Timestamp) -> Result<Timestamp, LifecycleError> {
        cutoff(now, self.active_timeout)
    }

    /// Abandoned carts last touched strictly before this instant are expired.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] if the cutoff is out of range.
    pub fn purge_cutoff(&self, now: Timestamp) -> Result<Timestamp, LifecycleError> {
        cutoff(now, self.abandoned_retention)
    }

    /// Whether `cart` is active and idle past the active timeout.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] if the cutoff is out of range.
    pub fn is_stale(&self, cart: &Cart, now: Timestamp) -> Result<bool, LifecycleError> {
        Ok(cart.status() == CartStatus::Active
            && cart.last_interaction_at() < self.abandon_cutoff(now)?)
    }

    /// Whether `cart` is abandoned and idle past the retention window.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] if the cutoff is out of range.
    pub fn is_expired(&self, cart: &Cart, now: Timestamp) -> Result<bool, LifecycleError> {
        Ok(cart.status() == CartStatus::Abandoned
            && cart.last_interaction_at() < self.purge_cutoff(now)?)
    }
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_ACTIVE_TIMEOUT,
            Self::DEFAULT_ABANDONED_RETENTION,
        )
    }
}

fn cutoff(now: Timestamp, window: SignedDuration) -> Result<Timestamp, LifecycleError> {
    now.checked_sub(window).map_err(|source| LifecycleError {
        now,
        window,
        source,
    })
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::cart::CartId;

    use super::*;

    fn cart_idle_for(now: Timestamp, idle: SignedDuration) -> TestResult<Cart> {
        Ok(Cart::new(CartId::new(), iso::GBP, now.checked_sub(idle)?))
    }

    #[test]
    fn active_cart_past_timeout_is_stale() -> TestResult {
        let now = Timestamp::now();
        let policy = LifecyclePolicy::default();

        let fresh = cart_idle_for(now, SignedDuration::from_mins(179))?;
        let stale = cart_idle_for(now, SignedDuration::from_mins(181))?;

        assert!(!policy.is_stale(&fresh, now)?, "179 minutes is within 3h");
        assert!(policy.is_stale(&stale, now)?, "181 minutes is past 3h");

        Ok(())
    }

    #[test]
    fn boundary_is_not_stale() -> TestResult {
        let now = Timestamp::now();
        let policy = LifecyclePolicy::default();
        let cart = cart_idle_for(now, LifecyclePolicy::DEFAULT_ACTIVE_TIMEOUT)?;

        assert!(!policy.is_stale(&cart, now)?, "exactly 3h idle is kept");

        Ok(())
    }

    #[test]
    fn only_abandoned_carts_expire() -> TestResult {
        let now = Timestamp::now();
        let policy = LifecyclePolicy::default();
        let mut cart = cart_idle_for(now, SignedDuration::from_hours(8 * 24))?;

        assert!(!policy.is_expired(&cart, now)?, "active carts never expire");

        cart.mark_abandoned();

        assert!(policy.is_expired(&cart, now)?, "8 days is past retention");
        assert!(!policy.is_stale(&cart, now)?, "abandoned carts are not stale");

        Ok(())
    }

    #[test]
    fn cutoff_out_of_range_is_an_error() {
        let policy = LifecyclePolicy::new(SignedDuration::MAX, SignedDuration::MAX);

        assert!(
            policy.abandon_cutoff(Timestamp::MIN).is_err(),
            "subtracting from the minimum timestamp must fail"
        );
    }
}
