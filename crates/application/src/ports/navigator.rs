//! Navigation port.

use taskboard_domain::Route;

/// Port through which the session layer sends the user to another surface.
///
/// The session core only ever navigates to sign-in (on eviction) or home
/// (after sign-in); rendering the route is the shell's job.
pub trait Navigator: Send + Sync {
    /// Requests navigation to `route`.
    fn navigate(&self, route: Route);
}
