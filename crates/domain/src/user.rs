//! The authenticated user's profile, as far as the session layer needs it.

use serde::{Deserialize, Serialize};

/// Profile returned by `GET /user/email/{subject}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Numeric user id used by the board endpoints.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Email, equal to the token subject.
    pub email: String,
    /// The user's board, opaque to the session layer.
    #[serde(default)]
    pub board: Option<serde_json::Value>,
}

impl UserProfile {
    /// True when the backend already created a board for this user.
    #[must_use]
    pub fn has_board(&self) -> bool {
        self.board.as_ref().is_some_and(|board| !board.is_null())
    }
}

/// Body of `PUT /user/update/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New display name.
    pub name: String,
    /// New email.
    pub email: String,
}
