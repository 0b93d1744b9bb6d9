//! Periodic sweeping.

use std::{sync::Arc, time::Duration};

use jiff::Timestamp;
use tokio::{
    task::{JoinError, JoinHandle},
    time::{MissedTickBehavior, interval},
};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::Sweeper;

/// Shortest period accepted; `tokio::time::interval` rejects zero.
const MIN_PERIOD: Duration = Duration::from_secs(1);

/// Handle to a running sweep loop.
#[derive(Debug)]
pub struct SweeperHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Token that stops the loop when cancelled.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Stop the loop and wait for it to finish. A sweep already in progress
    /// runs to completion first.
    ///
    /// # Errors
    ///
    /// Returns an error if the sweep task panicked.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        self.token.cancel();
        self.task.await
    }
}

impl Sweeper {
    /// Sweep immediately, then every `period`, until `token` is cancelled.
    ///
    /// Runs never overlap: a sweep that overruns its period delays the next one.
    pub async fn run_every(&self, period: Duration, token: CancellationToken) {
        let mut ticker = interval(period.max(MIN_PERIOD));

        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(period_secs = period.as_secs(), "sweeper started");

        loop {
            tokio::select! {
                biased;

                () = token.cancelled() => break,
                _ = ticker.tick() => {
                    self.run_once(Timestamp::now()).await;
                }
            }
        }

        info!("sweeper stopped");
    }

    /// Spawn [`Sweeper::run_every`] onto the runtime.
    pub fn spawn(self: Arc<Self>, period: Duration, token: CancellationToken) -> SweeperHandle {
        let task = tokio::spawn({
            let token = token.clone();

            async move { self.run_every(period, token).await }
        });

        SweeperHandle { token, task }
    }
}
