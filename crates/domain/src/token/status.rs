//! Human-facing token status.

use chrono::{DateTime, Utc};

use super::codec::decode;

/// Status of a stored access token for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    /// No token is stored.
    NotAuthenticated,
    /// A token is stored but its payload cannot be read.
    Unreadable,
    /// Token is valid.
    Valid {
        /// Seconds until expiry.
        seconds_remaining: i64,
    },
    /// Token has expired.
    Expired {
        /// Whether a refresh token is available to renew it.
        can_refresh: bool,
    },
}

impl TokenStatus {
    /// Returns true if the token is currently usable.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Get a user-friendly display message.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::NotAuthenticated => "Not signed in".to_string(),
            Self::Unreadable => "Stored token is unreadable".to_string(),
            Self::Valid { seconds_remaining } => {
                let secs = *seconds_remaining;
                if secs > 3600 {
                    format!("Valid for {} hours", secs / 3600)
                } else if secs > 60 {
                    format!("Valid for {} minutes", secs / 60)
                } else {
                    format!("Valid for {secs} seconds")
                }
            }
            Self::Expired { can_refresh: true } => "Expired (can refresh)".to_string(),
            Self::Expired { can_refresh: false } => "Expired".to_string(),
        }
    }
}

/// Computes the status of `access_token` at `now`.
#[must_use]
pub fn token_status(
    access_token: Option<&str>,
    has_refresh_token: bool,
    now: DateTime<Utc>,
) -> TokenStatus {
    let Some(token) = access_token else {
        return TokenStatus::NotAuthenticated;
    };
    let Ok(claims) = decode(token) else {
        return TokenStatus::Unreadable;
    };
    if claims.is_live_at(now) {
        TokenStatus::Valid {
            seconds_remaining: (claims.expiry_millis - now.timestamp_millis()) / 1000,
        }
    } else {
        TokenStatus::Expired {
            can_refresh: has_refresh_token,
        }
    }
}

/// First few characters of a token, safe for logs.
#[must_use]
pub fn token_preview(token: &str) -> String {
    if token.len() > 12 {
        let cut = token
            .char_indices()
            .nth(8)
            .map_or(token.len(), |(idx, _)| idx);
        format!("{}...", &token[..cut])
    } else {
        token.to_string()
    }
}
