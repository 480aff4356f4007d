//! Response value returned by the transport port.

use std::time::Duration;

use super::{CONTENT_TYPE, Headers};

/// HTTP response as seen by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body decoded as UTF-8 (lossy)
    pub body: String,
    /// Time from send to full body
    pub duration: Duration,
}

impl ApiResponse {
    /// Creates a response with the given status and body.
    #[must_use]
    pub fn new(status: u16, headers: Headers, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
            duration: Duration::ZERO,
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns the declared content type, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_checks() {
        assert!(ApiResponse::new(204, Headers::new(), "").is_success());
        assert!(!ApiResponse::new(401, Headers::new(), "").is_success());
        assert!(!ApiResponse::new(500, Headers::new(), "").is_success());
    }

    #[test]
    fn test_content_type_lookup() {
        let mut headers = Headers::new();
        headers.set("content-type", "application/json; charset=utf-8");
        let response = ApiResponse::new(200, headers, "{}");
        assert_eq!(
            response.content_type(),
            Some("application/json; charset=utf-8")
        );
    }
}
