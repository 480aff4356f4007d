//! Thin wrappers over the board backend endpoints.
//!
//! Bodies other than the user profile are passed through as JSON values; the
//! wrappers only build URLs and route calls through the gateway.

mod board;
mod user;

pub use board::BoardApi;
pub use user::UserApi;
