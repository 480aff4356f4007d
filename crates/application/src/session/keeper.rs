//! Lifecycle-driven refresh triggers.
//!
//! Activating a [`SessionKeeper`] runs the mount refresh and registers a
//! listener for focus and visibility events. Deactivating it (or dropping the
//! [`ActiveSession`]) unregisters the listener; an exchange still in flight
//! at that point is abandoned and can no longer evict or redirect.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::evict;
use super::refresh::{RefreshCoordinator, RefreshTrigger};
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{Navigator, TokenStore};

const EVENT_BUFFER: usize = 16;

/// Page visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// The view is shown.
    Visible,
    /// The view is in the background.
    Hidden,
}

/// UI lifecycle events that may warrant a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The window regained focus.
    FocusGained,
    /// The document visibility changed.
    VisibilityChanged(Visibility),
}

impl LifecycleEvent {
    /// The refresh trigger this event maps to, if any.
    #[must_use]
    pub const fn trigger(self) -> Option<RefreshTrigger> {
        match self {
            Self::FocusGained => Some(RefreshTrigger::FocusRegained),
            Self::VisibilityChanged(Visibility::Visible) => Some(RefreshTrigger::BecameVisible),
            Self::VisibilityChanged(Visibility::Hidden) => None,
        }
    }
}

/// Owns the proactive refresh of a protected view.
#[derive(Clone)]
pub struct SessionKeeper {
    coordinator: Arc<RefreshCoordinator>,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionKeeper {
    /// Creates a keeper.
    #[must_use]
    pub fn new(
        coordinator: Arc<RefreshCoordinator>,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            coordinator,
            store,
            navigator,
        }
    }

    /// Runs the mount refresh and registers the lifecycle listener.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::SignedOut`] when the mount refresh fails;
    /// the session has then been evicted and sign-in requested, and no
    /// listener is registered.
    pub async fn activate(&self) -> ApplicationResult<ActiveSession> {
        if self
            .coordinator
            .refresh(RefreshTrigger::Mount)
            .await
            .is_none()
        {
            evict(self.store.as_ref(), self.navigator.as_ref()).await;
            return Err(ApplicationError::SignedOut);
        }

        let (events, mut receiver) = mpsc::channel::<LifecycleEvent>(EVENT_BUFFER);
        let live = Arc::new(AtomicBool::new(true));
        let keeper = self.clone();
        let task_live = Arc::clone(&live);

        let task = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                let Some(trigger) = event.trigger() else {
                    continue;
                };
                let refreshed = keeper.coordinator.refresh(trigger).await;
                if !task_live.load(Ordering::SeqCst) {
                    break;
                }
                if refreshed.is_none() {
                    evict(keeper.store.as_ref(), keeper.navigator.as_ref()).await;
                }
            }
            debug!("lifecycle listener stopped");
        });

        debug!("lifecycle listener registered");
        Ok(ActiveSession {
            events,
            live,
            task: Some(task),
        })
    }
}

/// Handle to a registered lifecycle listener.
#[derive(Debug)]
pub struct ActiveSession {
    events: mpsc::Sender<LifecycleEvent>,
    live: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl ActiveSession {
    /// Forwards a lifecycle event. Returns false once deactivated or when the
    /// listener is saturated.
    pub fn notify(&self, event: LifecycleEvent) -> bool {
        self.is_active() && self.events.try_send(event).is_ok()
    }

    /// Whether the listener is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Unregisters the listener and waits for it to stop.
    pub async fn deactivate(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            // An aborted task resolves to a cancellation error.
            let _ = task.await;
        }
    }

    fn shutdown(&mut self) {
        if self.live.swap(false, Ordering::SeqCst) {
            debug!("lifecycle listener unregistered");
        }
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::session::{InMemoryTokenStore, RefreshState};
    use crate::testing::{
        RecordingNavigator, ScriptedHttpClient, endpoints, json_response, refreshed,
    };
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use taskboard_domain::{Route, SessionKey, TokenPair};

    struct Fixture {
        store: InMemoryTokenStore,
        http: Arc<ScriptedHttpClient>,
        navigator: Arc<RecordingNavigator>,
        coordinator: Arc<RefreshCoordinator>,
        keeper: SessionKeeper,
    }

    fn fixture(http: ScriptedHttpClient) -> Fixture {
        let store = InMemoryTokenStore::with_session(&TokenPair::new("T1", "R1"));
        let http = Arc::new(http);
        let navigator = RecordingNavigator::new();
        let coordinator = Arc::new(RefreshCoordinator::new(
            Arc::new(store.clone()),
            http.clone(),
            endpoints().refresh(),
        ));
        let keeper = SessionKeeper::new(
            Arc::clone(&coordinator),
            Arc::new(store.clone()),
            navigator.clone(),
        );
        Fixture {
            store,
            http,
            navigator,
            coordinator,
            keeper,
        }
    }

    async fn wait_for_calls(http: &ScriptedHttpClient, expected: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while http.calls().len() < expected {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            LifecycleEvent::FocusGained.trigger(),
            Some(RefreshTrigger::FocusRegained)
        );
        assert_eq!(
            LifecycleEvent::VisibilityChanged(Visibility::Visible).trigger(),
            Some(RefreshTrigger::BecameVisible)
        );
        assert_eq!(
            LifecycleEvent::VisibilityChanged(Visibility::Hidden).trigger(),
            None
        );
    }

    #[tokio::test]
    async fn test_mount_failure_evicts_and_redirects() {
        let f = fixture(ScriptedHttpClient::new());
        f.http
            .respond(&endpoints().refresh(), json_response(401, "{}"));

        let result = f.keeper.activate().await;

        assert!(matches!(result, Err(ApplicationError::SignedOut)));
        assert_eq!(f.store.count().await, 0);
        assert_eq!(f.navigator.routes(), vec![Route::SignIn]);
    }

    #[tokio::test]
    async fn test_focus_triggers_refresh() {
        let f = fixture(ScriptedHttpClient::new());
        f.http
            .respond(&endpoints().refresh(), refreshed("T2"))
            .respond(&endpoints().refresh(), refreshed("T3"));

        let session = f.keeper.activate().await.unwrap();
        assert!(session.notify(LifecycleEvent::VisibilityChanged(Visibility::Hidden)));
        assert!(session.notify(LifecycleEvent::FocusGained));
        wait_for_calls(&f.http, 2).await;

        tokio::time::timeout(Duration::from_secs(2), async {
            while f.store.get(SessionKey::AccessToken).await.as_deref() != Some("T3") {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
        session.deactivate().await;
        assert!(f.navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn test_failed_trigger_refresh_evicts() {
        let f = fixture(ScriptedHttpClient::new());
        f.http
            .respond(&endpoints().refresh(), refreshed("T2"))
            .respond(&endpoints().refresh(), json_response(500, "down"));

        let session = f.keeper.activate().await.unwrap();
        session.notify(LifecycleEvent::VisibilityChanged(Visibility::Visible));

        tokio::time::timeout(Duration::from_secs(2), async {
            while f.navigator.routes().is_empty() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
        assert_eq!(f.navigator.routes(), vec![Route::SignIn]);
        assert_eq!(f.store.count().await, 0);
    }

    #[tokio::test]
    async fn test_deactivate_abandons_in_flight_refresh() {
        let f = fixture(ScriptedHttpClient::with_delay(Duration::from_millis(50)));
        f.http
            .respond(&endpoints().refresh(), refreshed("T2"))
            .respond(&endpoints().refresh(), json_response(500, "down"));

        let session = f.keeper.activate().await.unwrap();
        assert!(session.notify(LifecycleEvent::FocusGained));
        wait_for_calls(&f.http, 2).await;

        session.deactivate().await;
        assert_eq!(f.coordinator.state(), RefreshState::Idle);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(f.navigator.routes().is_empty());
        assert_eq!(
            f.store.get(SessionKey::AccessToken).await.as_deref(),
            Some("T2")
        );
    }

    #[tokio::test]
    async fn test_notify_after_shutdown_is_rejected() {
        let f = fixture(ScriptedHttpClient::new());
        f.http.respond(&endpoints().refresh(), refreshed("T2"));

        let mut session = f.keeper.activate().await.unwrap();
        session.shutdown();
        assert!(!session.is_active());
        assert!(!session.notify(LifecycleEvent::FocusGained));
        drop(session);
        assert_eq!(f.http.calls().len(), 1);
    }
}
