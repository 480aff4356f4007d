//! Taskboard Domain - Core session types
//!
//! This crate defines the value types of the Taskboard client: the token
//! codec, session keys, routes, HTTP request/response values and the backend
//! endpoint catalogue. All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod route;
pub mod session;
pub mod token;
pub mod user;

pub use auth::{RefreshRequest, RefreshResponse, SignInRequest, SignUpRequest};
pub use endpoints::Endpoints;
pub use error::{DomainError, DomainResult};
pub use http::{ApiRequest, ApiResponse, Header, Headers, HttpMethod};
pub use route::Route;
pub use session::{SessionKey, SessionSnapshot, TokenPair};
pub use token::{TokenClaims, TokenDecodeError, TokenStatus};
pub use user::{ProfileUpdate, UserProfile};
