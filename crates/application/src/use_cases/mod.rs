//! Application use cases (session flows driven by the UI shell).

mod enter_home;
mod load_profile;
mod logout;
mod sign_in;
mod sign_up;

pub use enter_home::{EnterHome, HomeView};
pub use load_profile::LoadProfile;
pub use logout::Logout;
pub use sign_in::SignIn;
pub use sign_up::SignUp;

use taskboard_domain::{Route, TokenPair};
use tracing::info;

use crate::error::{ApplicationError, ApplicationResult};
use crate::gateway::Reply;
use crate::ports::{Navigator, TokenStore};

/// Stores the pair issued by an auth endpoint and enters the board.
async fn open_session(
    reply: Reply,
    store: &dyn TokenStore,
    navigator: &dyn Navigator,
) -> ApplicationResult<TokenPair> {
    let pair: TokenPair = reply.json()?.ok_or_else(|| {
        ApplicationError::UnexpectedResponse("auth response carried no tokens".to_string())
    })?;
    store.replace_session(&pair).await;
    info!("session opened");
    navigator.navigate(Route::Home);
    Ok(pair)
}
