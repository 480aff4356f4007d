//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the session core and external systems.
//! Each port is a trait implemented by adapters in the infrastructure layer;
//! tests substitute in-process doubles.

mod clock;
mod http_client;
mod navigator;
mod token_store;

pub use clock::Clock;
pub use http_client::{HttpClient, HttpClientError};
pub use navigator::Navigator;
pub use token_store::TokenStore;
