//! Home route gate.

use std::sync::Arc;

use taskboard_domain::{Route, SessionSnapshot, UserProfile};
use tracing::{info, warn};

use super::LoadProfile;
use crate::api::BoardApi;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::Navigator;
use crate::session::{ActiveSession, SessionGuard, SessionKeeper};

/// What the home view needs once the gate has been passed.
#[derive(Debug)]
pub struct HomeView {
    /// The signed-in user.
    pub profile: UserProfile,
    /// Session evaluated after the mount refresh.
    pub session: SessionSnapshot,
    /// Registered lifecycle listener; dropping it unregisters.
    pub keeper: ActiveSession,
}

/// Admits the user to the board or sends them to sign-in.
pub struct EnterHome {
    guard: SessionGuard,
    keeper: SessionKeeper,
    profile: LoadProfile,
    boards: BoardApi,
    navigator: Arc<dyn Navigator>,
}

impl EnterHome {
    /// Creates a new `EnterHome` use case.
    #[must_use]
    pub fn new(
        guard: SessionGuard,
        keeper: SessionKeeper,
        profile: LoadProfile,
        boards: BoardApi,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            guard,
            keeper,
            profile,
            boards,
            navigator,
        }
    }

    /// Runs the gate.
    ///
    /// An unauthenticated session is redirected without any network call.
    /// Otherwise the mount refresh runs, the profile is loaded and a board is
    /// created for users that have none yet. Board creation failures are
    /// logged and do not block entry.
    ///
    /// # Errors
    ///
    /// Any failure before the profile is known. Sign-in has been requested
    /// in every error case.
    pub async fn execute(&self) -> ApplicationResult<HomeView> {
        if !self.guard.evaluate().await.is_authenticated {
            self.navigator.navigate(Route::SignIn);
            return Err(ApplicationError::NotAuthenticated);
        }

        let keeper = self.keeper.activate().await?;

        let profile = match self.profile.execute().await {
            Ok(profile) => profile,
            Err(error) => {
                keeper.deactivate().await;
                if !matches!(error, ApplicationError::SignedOut) {
                    warn!(error = %error, "profile unavailable, leaving home");
                    self.navigator.navigate(Route::SignIn);
                }
                return Err(error);
            }
        };

        if !profile.has_board() {
            match self.boards.create_board(profile.id).await {
                Ok(_) => info!(user_id = profile.id, "board created"),
                Err(error) => warn!(user_id = profile.id, error = %error, "board creation failed"),
            }
        }

        Ok(HomeView {
            session: self.guard.evaluate().await,
            profile,
            keeper,
        })
    }
}
