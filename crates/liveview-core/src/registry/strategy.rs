//! What happens to a session when its inactivity watchdog fires.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use liveview_protocols::ClientEvent;
use tracing::{debug, info};

use crate::router::{ComponentHandle, SessionRouter};

pub(crate) type SessionMap = DashMap<String, Arc<SessionRouter>>;

/// A session moved out of the registry by [`CloseStrategy::MoveToSwap`].
pub struct SwappedSession {
    pub identity: String,
    pub router: Arc<SessionRouter>,
    /// Event whose dispatch armed the timer that fired, `None` if the
    /// session saw no event since its last connection attached.
    pub event: Option<ClientEvent>,
    pub active_component: Option<ComponentHandle>,
}

/// Receives sessions evicted by [`CloseStrategy::MoveToSwap`].
pub type SwapCompletion = Arc<dyn Fn(SwappedSession) + Send + Sync>;

/// Eviction policy for inactive sessions.
#[derive(Clone)]
pub enum CloseStrategy {
    /// Drop the session's router.
    DeleteSession { after: Duration },
    /// Remove the session's router and hand it to `completion`.
    MoveToSwap {
        after: Duration,
        completion: SwapCompletion,
    },
}

impl CloseStrategy {
    pub fn delete_after(after: Duration) -> Self {
        CloseStrategy::DeleteSession { after }
    }

    pub fn swap_after<F>(after: Duration, completion: F) -> Self
    where
        F: Fn(SwappedSession) + Send + Sync + 'static,
    {
        CloseStrategy::MoveToSwap {
            after,
            completion: Arc::new(completion),
        }
    }

    /// Inactivity interval before the strategy applies.
    pub fn after(&self) -> Duration {
        match self {
            CloseStrategy::DeleteSession { after } | CloseStrategy::MoveToSwap { after, .. } => {
                *after
            }
        }
    }

    /// Evict `router` if it is still the session registered for `identity`.
    pub(crate) fn apply(
        &self,
        sessions: &SessionMap,
        identity: &str,
        router: Arc<SessionRouter>,
        event: Option<ClientEvent>,
        active_component: Option<ComponentHandle>,
    ) {
        let removed = sessions
            .remove_if(identity, |_, current| Arc::ptr_eq(current, &router))
            .is_some();
        if !removed {
            debug!("Session {} already left the registry", router.id());
            return;
        }

        match self {
            CloseStrategy::DeleteSession { .. } => {
                info!("Deleted inactive session {}", router.id());
            }
            CloseStrategy::MoveToSwap { completion, .. } => {
                info!("Moved inactive session {} to swap", router.id());
                completion(SwappedSession {
                    identity: identity.to_string(),
                    router,
                    event,
                    active_component,
                });
            }
        }
    }
}

impl Default for CloseStrategy {
    /// Delete after one hour.
    fn default() -> Self {
        CloseStrategy::DeleteSession {
            after: Duration::from_secs(3600),
        }
    }
}

impl fmt::Debug for CloseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseStrategy::DeleteSession { after } => f
                .debug_struct("DeleteSession")
                .field("after", after)
                .finish(),
            CloseStrategy::MoveToSwap { after, .. } => f
                .debug_struct("MoveToSwap")
                .field("after", after)
                .finish_non_exhaustive(),
        }
    }
}
