//! Gateway results.

use serde::de::DeserializeOwned;
use serde_json::Value;
use taskboard_domain::ApiResponse;

use crate::ports::HttpClientError;

const GENERIC_FAILURE: &str = "Request failed";

/// Errors surfaced by the gateway to the calling layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Unsuccessful status not resolved by a refresh. Displays the server's
    /// message, or a generic one when the body was empty.
    #[error("{message}")]
    Request {
        /// HTTP status.
        status: u16,
        /// Response body text.
        message: String,
    },

    /// No response was received.
    #[error(transparent)]
    Network(#[from] HttpClientError),

    /// A successful response carried a body that did not parse.
    #[error("unexpected response body: {0}")]
    Body(String),
}

impl ApiError {
    /// HTTP status, when the backend answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Parsed outcome of a gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// JSON body.
    Json(Value),
    /// Textual body.
    Text(String),
    /// Success without a recognised body.
    Empty,
    /// The refresh failed; the session was evicted and sign-in requested.
    SignedOut,
}

impl Reply {
    /// Classifies a response by status and declared content type.
    ///
    /// # Errors
    ///
    /// [`ApiError::Request`] for a non-success status, [`ApiError::Body`] for
    /// an unparsable JSON body.
    pub fn from_response(response: ApiResponse) -> Result<Self, ApiError> {
        if !response.is_success() {
            let message = if response.body.trim().is_empty() {
                GENERIC_FAILURE.to_string()
            } else {
                response.body
            };
            return Err(ApiError::Request {
                status: response.status,
                message,
            });
        }

        let Some(media) = response
            .content_type()
            .and_then(|ct| ct.parse::<mime::Mime>().ok())
        else {
            return Ok(Self::Empty);
        };

        if media.subtype() == mime::JSON || media.suffix() == Some(mime::JSON) {
            if response.body.trim().is_empty() {
                return Ok(Self::Empty);
            }
            return serde_json::from_str(&response.body)
                .map(Self::Json)
                .map_err(|e| ApiError::Body(e.to_string()));
        }
        if media.type_() == mime::TEXT {
            return Ok(Self::Text(response.body));
        }
        Ok(Self::Empty)
    }

    /// True when the call ended the session.
    #[must_use]
    pub const fn is_signed_out(&self) -> bool {
        matches!(self, Self::SignedOut)
    }

    /// Deserializes the body into `T`; `None` when there is no body.
    ///
    /// # Errors
    ///
    /// [`ApiError::Body`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<Option<T>, ApiError> {
        let parsed = match self {
            Self::Json(value) => serde_json::from_value(value),
            Self::Text(text) => serde_json::from_str(&text),
            Self::Empty | Self::SignedOut => return Ok(None),
        };
        parsed.map(Some).map_err(|e| ApiError::Body(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{bare_response, json_response, text_response};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use taskboard_domain::Headers;

    fn with_content_type(content_type: &str, body: &str) -> ApiResponse {
        let mut headers = Headers::new();
        headers.set("Content-Type", content_type);
        ApiResponse::new(200, headers, body)
    }

    #[test]
    fn test_content_type_classification() {
        assert_eq!(
            Reply::from_response(json_response(200, r#"{"a":1}"#)).unwrap(),
            Reply::Json(json!({"a": 1}))
        );
        assert_eq!(
            Reply::from_response(with_content_type("application/problem+json", "[1]")).unwrap(),
            Reply::Json(json!([1]))
        );
        assert_eq!(
            Reply::from_response(text_response(200, "deleted")).unwrap(),
            Reply::Text("deleted".to_string())
        );
        assert_eq!(
            Reply::from_response(with_content_type("application/octet-stream", "xx")).unwrap(),
            Reply::Empty
        );
        assert_eq!(
            Reply::from_response(bare_response(204)).unwrap(),
            Reply::Empty
        );
        assert_eq!(
            Reply::from_response(json_response(200, "")).unwrap(),
            Reply::Empty
        );
    }

    #[test]
    fn test_invalid_json_body() {
        let error = Reply::from_response(json_response(200, "{oops")).unwrap_err();
        assert!(matches!(error, ApiError::Body(_)));
    }

    #[test]
    fn test_error_message_fallback() {
        let error = Reply::from_response(text_response(500, "   ")).unwrap_err();
        assert_eq!(error.to_string(), "Request failed");
        assert_eq!(error.status(), Some(500));
    }

    #[test]
    fn test_typed_decoding() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Board {
            id: i64,
        }

        assert_eq!(
            Reply::Json(json!({"id": 3})).json::<Board>().unwrap(),
            Some(Board { id: 3 })
        );
        assert_eq!(Reply::SignedOut.json::<Board>().unwrap(), None);
        assert!(Reply::Json(json!("x")).json::<Board>().is_err());
    }
}
