//! Taskboard Application - Session core
//!
//! This crate holds the client-side session lifecycle: the ports adapters
//! implement, the session guard, refresh coordination, the authenticated
//! request gateway and the use cases the UI shell drives.

pub mod api;
pub mod error;
pub mod gateway;
pub mod ports;
pub mod session;
pub mod use_cases;

#[cfg(test)]
mod testing;

pub use api::{BoardApi, UserApi};
pub use error::{ApplicationError, ApplicationResult};
pub use gateway::{ApiError, ApiGateway, Reply, RetryPolicy};
pub use session::{
    ActiveSession, InMemoryTokenStore, LifecycleEvent, RefreshCoordinator, RefreshState,
    RefreshTrigger, SessionGuard, SessionKeeper, Visibility,
};
pub use use_cases::{EnterHome, HomeView, LoadProfile, Logout, SignIn, SignUp};
