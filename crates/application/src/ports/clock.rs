//! Time source for token expiry checks.

use chrono::{DateTime, TimeDelta, Utc};

/// Port for the instant tokens are judged against.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Margin before `exp` at which a token already counts as expired.
    fn expiry_leeway(&self) -> TimeDelta {
        TimeDelta::zero()
    }

    /// Instant token expiry is compared with: [`Clock::now`] shifted forward
    /// by [`Clock::expiry_leeway`].
    fn validity_instant(&self) -> DateTime<Utc> {
        self.now() + self.expiry_leeway()
    }
}
