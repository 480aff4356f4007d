//! HTTP value types exchanged between the gateway and the transport port.

mod header;
mod method;
mod request;
mod response;

pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use request::ApiRequest;
pub use response::ApiResponse;

/// Header carrying the bearer credential.
pub const AUTHORIZATION: &str = "Authorization";

/// Header declaring the body media type.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Media type used for every request body the client sends.
pub const JSON_MEDIA_TYPE: &str = "application/json";
