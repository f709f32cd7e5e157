//! Inactivity watchdog.
//!
//! One pending timer per session. The timer task only sleeps; everything it
//! decides happens under the session lock in
//! [`SessionRouter::fire_timeout`](super::SessionRouter), where it checks that
//! it is still the current timer before running the callback.

use std::sync::Weak;
use std::time::Duration;

use liveview_protocols::ClientEvent;
use tokio_util::sync::CancellationToken;

use super::{SessionRouter, TimeoutCallback};

/// Handle to the session's pending timer. Dropping it cancels the timer.
pub(crate) struct PendingTimer {
    generation: u64,
    token: CancellationToken,
}

impl PendingTimer {
    /// Spawn the timer task for `router`.
    pub(crate) fn start(
        router: Weak<SessionRouter>,
        generation: u64,
        interval: Duration,
        event: Option<ClientEvent>,
        on_timeout: TimeoutCallback,
    ) -> Self {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(interval) => {
                    if let Some(router) = router.upgrade() {
                        router.fire_timeout(generation, event, on_timeout).await;
                    }
                }
            }
        });

        Self { generation, token }
    }

    /// Whether this is the timer started as `generation` and is still armed.
    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.generation == generation && !self.token.is_cancelled()
    }
}

impl Drop for PendingTimer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
