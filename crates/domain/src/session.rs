//! Session vocabulary: the persisted keys and the token pair.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::token::token_preview;

/// Storage key for one half of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionKey {
    /// Short-lived bearer credential.
    AccessToken,
    /// Long-lived credential exchanged for new access tokens.
    RefreshToken,
}

impl SessionKey {
    /// Both keys, in storage order.
    pub const ALL: [Self; 2] = [Self::AccessToken, Self::RefreshToken];

    /// Name used in durable storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
        }
    }

    /// Parses a storage name.
    #[must_use]
    pub fn from_storage_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token pair issued by sign-in and sign-up.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Bearer credential.
    pub access_token: String,
    /// Refresh credential.
    pub refresh_token: String,
}

impl TokenPair {
    /// Creates a pair.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Value stored under `key`.
    #[must_use]
    pub fn get(&self, key: SessionKey) -> &str {
        match key {
            SessionKey::AccessToken => &self.access_token,
            SessionKey::RefreshToken => &self.refresh_token,
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &token_preview(&self.access_token))
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Result of evaluating the stored session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    /// Whether protected content may be shown.
    pub is_authenticated: bool,
    /// Stored access token, if any.
    pub access_token: Option<String>,
    /// Stored refresh token, if any.
    pub refresh_token: Option<String>,
}
