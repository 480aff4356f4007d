//! Wall-clock time source.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use taskboard_application::ports::Clock;

/// Wall clock, optionally treating tokens as expired slightly early so a
/// token about to lapse is not sent on a request that outlives it.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    leeway: TimeDelta,
}

impl SystemClock {
    /// Clock with no expiry leeway.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            leeway: TimeDelta::zero(),
        }
    }

    /// Clock that expires tokens `leeway` before their `exp` claim.
    #[must_use]
    pub fn with_leeway(leeway: Duration) -> Self {
        Self {
            leeway: TimeDelta::from_std(leeway).unwrap_or(TimeDelta::zero()),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn expiry_leeway(&self) -> TimeDelta {
        self.leeway
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_leeway_judges_tokens_at_wall_time() {
        let clock = SystemClock::new();
        let before = Utc::now();

        assert_eq!(clock.expiry_leeway(), TimeDelta::zero());
        let instant = clock.validity_instant();
        assert!(instant >= before);
        assert!(instant <= Utc::now());
    }

    #[test]
    fn test_leeway_moves_validity_instant_forward() {
        let clock = SystemClock::with_leeway(Duration::from_secs(30));
        let before = Utc::now();

        assert_eq!(clock.expiry_leeway(), TimeDelta::seconds(30));
        assert!(clock.validity_instant() >= before + TimeDelta::seconds(30));
        assert!(clock.now() < before + TimeDelta::seconds(30));
    }
}
