//! Navigator backed by a watch channel.

use taskboard_application::ports::Navigator;
use taskboard_domain::Route;
use tokio::sync::watch;
use tracing::info;

/// Publishes navigation requests to whoever renders routes.
///
/// Only the latest route matters to a renderer, so intermediate requests may
/// be coalesced by slow subscribers.
#[derive(Debug)]
pub struct RouteChannel {
    sender: watch::Sender<Route>,
}

impl RouteChannel {
    /// Creates a channel positioned at `initial`.
    #[must_use]
    pub fn new(initial: Route) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Route most recently requested.
    #[must_use]
    pub fn current(&self) -> Route {
        *self.sender.borrow()
    }

    /// Subscribes to navigation requests.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.sender.subscribe()
    }
}

impl Default for RouteChannel {
    fn default() -> Self {
        Self::new(Route::default())
    }
}

impl Navigator for RouteChannel {
    fn navigate(&self, route: Route) {
        info!(path = route.path(), "navigating");
        self.sender.send_replace(route);
    }
}
