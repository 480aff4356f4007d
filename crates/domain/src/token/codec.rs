//! Payload decoding and expiry checks.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Why a token could not be decoded.
///
/// Every variant means the same thing to callers: the token is not valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenDecodeError {
    /// The token does not have exactly three segments.
    #[error("expected 3 token segments, found {found}")]
    SegmentCount {
        /// Number of segments present.
        found: usize,
    },
    /// The payload segment is not base64.
    #[error("payload is not base64: {0}")]
    Base64(String),
    /// The payload is not a JSON object.
    #[error("payload is not a JSON object: {0}")]
    Json(String),
    /// A required claim is absent.
    #[error("missing claim `{0}`")]
    MissingClaim(&'static str),
    /// A claim has the wrong type.
    #[error("claim `{0}` has an unexpected type")]
    InvalidClaim(&'static str),
}

/// Claims the client relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Stable user identifier (`sub`). The backend keys profiles by it.
    pub subject: String,
    /// Expiry (`exp`) in milliseconds since the epoch.
    pub expiry_millis: i64,
}

impl TokenClaims {
    /// Expiry in whole epoch seconds.
    #[must_use]
    pub const fn expiry_epoch_seconds(&self) -> i64 {
        self.expiry_millis.div_euclid(1000)
    }

    /// Expiry as a timestamp, if representable.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.expiry_millis).single()
    }

    /// True while `now` is strictly before expiry.
    #[must_use]
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_millis > now.timestamp_millis()
    }
}

/// Decodes the payload of `token` without verifying its signature.
///
/// # Errors
///
/// Returns a [`TokenDecodeError`] for any structural problem.
pub fn decode(token: &str) -> Result<TokenClaims, TokenDecodeError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenDecodeError::SegmentCount {
            found: segments.len(),
        });
    }

    let payload = decode_segment(segments[1])?;
    let claims: Map<String, Value> =
        serde_json::from_slice(&payload).map_err(|e| TokenDecodeError::Json(e.to_string()))?;

    let subject = match claims.get("sub") {
        Some(Value::String(sub)) => sub.clone(),
        Some(Value::Number(sub)) => sub.to_string(),
        Some(_) => return Err(TokenDecodeError::InvalidClaim("sub")),
        None => return Err(TokenDecodeError::MissingClaim("sub")),
    };

    let expiry_millis = match claims.get("exp") {
        Some(Value::Number(exp)) => expiry_to_millis(exp)?,
        Some(_) => return Err(TokenDecodeError::InvalidClaim("exp")),
        None => return Err(TokenDecodeError::MissingClaim("exp")),
    };

    Ok(TokenClaims {
        subject,
        expiry_millis,
    })
}

/// True iff `token` decodes and its expiry lies after `now`.
#[must_use]
pub fn is_valid(token: &str, now: DateTime<Utc>) -> bool {
    decode(token).is_ok_and(|claims| claims.is_live_at(now))
}

/// Subject of `token`, or `None` if it does not decode.
#[must_use]
pub fn subject_of(token: &str) -> Option<String> {
    decode(token).ok().map(|claims| claims.subject)
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenDecodeError> {
    URL_SAFE_LENIENT
        .decode(segment)
        .or_else(|_| STANDARD_LENIENT.decode(segment))
        .map_err(|e| TokenDecodeError::Base64(e.to_string()))
}

#[allow(clippy::cast_possible_truncation)]
fn expiry_to_millis(exp: &serde_json::Number) -> Result<i64, TokenDecodeError> {
    if let Some(seconds) = exp.as_i64() {
        return seconds
            .checked_mul(1000)
            .ok_or(TokenDecodeError::InvalidClaim("exp"));
    }
    match exp.as_f64() {
        // Saturating float-to-int cast; fractional milliseconds are dropped.
        Some(seconds) if seconds.is_finite() => Ok((seconds * 1000.0) as i64),
        _ => Err(TokenDecodeError::InvalidClaim("exp")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
    use pretty_assertions::assert_eq;

    fn mint(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("{header}.{body}.c2lnbmF0dXJl")
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    #[test]
    fn test_decode_subject_and_expiry() {
        let token = mint(r#"{"sub":"a@b.com","exp":1700000000,"iat":1699996400}"#);
        let claims = decode(&token).unwrap();

        assert_eq!(claims.subject, "a@b.com");
        assert_eq!(claims.expiry_epoch_seconds(), 1_700_000_000);
        assert_eq!(claims.expires_at(), Some(at(1_700_000_000)));
    }

    #[test]
    fn test_validity_is_strictly_before_expiry() {
        let token = mint(r#"{"sub":"u","exp":1000}"#);

        assert!(is_valid(&token, at(999)));
        assert!(!is_valid(&token, at(1000)));
        assert!(!is_valid(&token, at(1001)));
    }

    #[test]
    fn test_fractional_expiry() {
        let token = mint(r#"{"sub":"u","exp":1000.5}"#);
        let just_before = Utc.timestamp_millis_opt(1_000_400).unwrap();
        let just_after = Utc.timestamp_millis_opt(1_000_500).unwrap();

        assert!(is_valid(&token, just_before));
        assert!(!is_valid(&token, just_after));
    }

    #[test]
    fn test_standard_alphabet_with_padding() {
        let payload = STANDARD.encode(br#"{"sub":"user?>","exp":4102444800}"#);
        let token = format!("h.{payload}.s");
        assert_eq!(decode(&token).unwrap().subject, "user?>");
    }

    #[test]
    fn test_numeric_subject() {
        let token = mint(r#"{"sub":42,"exp":4102444800}"#);
        assert_eq!(subject_of(&token).as_deref(), Some("42"));
    }

    #[test]
    fn test_wrong_segment_count() {
        assert_eq!(decode(""), Err(TokenDecodeError::SegmentCount { found: 1 }));
        assert_eq!(
            decode("a.b"),
            Err(TokenDecodeError::SegmentCount { found: 2 })
        );
        assert_eq!(
            decode("a.b.c.d"),
            Err(TokenDecodeError::SegmentCount { found: 4 })
        );
    }

    #[test]
    fn test_malformed_payloads_are_invalid() {
        let not_base64 = "h.%%%%.s";
        let not_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode(b"not json"));
        let not_object = format!("h.{}.s", URL_SAFE_NO_PAD.encode(b"[1,2]"));
        let no_exp = mint(r#"{"sub":"u"}"#);
        let no_sub = mint(r#"{"exp":4102444800}"#);
        let bad_exp = mint(r#"{"sub":"u","exp":"tomorrow"}"#);

        assert!(matches!(decode(not_base64), Err(TokenDecodeError::Base64(_))));
        assert!(matches!(decode(&not_json), Err(TokenDecodeError::Json(_))));
        assert!(matches!(decode(&not_object), Err(TokenDecodeError::Json(_))));
        assert_eq!(decode(&no_exp), Err(TokenDecodeError::MissingClaim("exp")));
        assert_eq!(decode(&no_sub), Err(TokenDecodeError::MissingClaim("sub")));
        assert_eq!(decode(&bad_exp), Err(TokenDecodeError::InvalidClaim("exp")));

        let now = at(0);
        for token in [
            not_base64,
            not_json.as_str(),
            not_object.as_str(),
            no_exp.as_str(),
            no_sub.as_str(),
            bad_exp.as_str(),
        ] {
            assert!(!is_valid(token, now));
        }
    }

    #[test]
    fn test_fresh_token_round_trip() {
        let now = Utc::now();
        let exp = now.timestamp() + 3600;
        let token = mint(&format!(r#"{{"sub":"a@b.com","exp":{exp}}}"#));

        assert_eq!(subject_of(&token).as_deref(), Some("a@b.com"));
        assert!(is_valid(&token, now));
    }
}
