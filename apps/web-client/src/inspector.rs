//! Display-only decoding of bearer tokens.
//!
//! Nothing here verifies a signature: the decoded view is for showing the
//! user what their token contains, never for trusting it.

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InspectError {
    #[error("token must have 3 dot-separated segments, found {0}")]
    Format(usize),
    #[error("malformed token {segment}: {reason}")]
    Malformed {
        segment: &'static str,
        reason: String,
    },
}

/// Header, payload and raw signature of a token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedToken {
    pub header: Value,
    pub payload: Value,
    /// Third segment, passed through untouched
    pub signature: String,
}

/// Split a raw token and decode its header and payload.
///
/// Either both segments decode or the whole operation fails; there is no
/// partial result.
pub fn inspect_token(raw: &str) -> Result<DecodedToken, InspectError> {
    let segments: Vec<&str> = raw.split('.').collect();
    let [header, payload, signature] = segments.as_slice() else {
        return Err(InspectError::Format(segments.len()));
    };

    Ok(DecodedToken {
        header: decode_segment(header, "header")?,
        payload: decode_segment(payload, "payload")?,
        signature: (*signature).to_string(),
    })
}

fn decode_segment(segment: &str, name: &'static str) -> Result<Value, InspectError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| InspectError::Malformed {
            segment: name,
            reason: e.to_string(),
        })?;

    serde_json::from_slice(&bytes).map_err(|e| InspectError::Malformed {
        segment: name,
        reason: e.to_string(),
    })
}

impl DecodedToken {
    /// NumericDate claim; fractional seconds are truncated.
    fn numeric_claim(&self, name: &str) -> Option<i64> {
        let value = self.payload.get(name)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
    }

    pub fn issued_at(&self) -> Option<OffsetDateTime> {
        self.numeric_claim("iat")
            .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
    }

    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        self.numeric_claim("exp")
            .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
    }

    /// Time left before `exp`, clamped at zero. `None` without an `exp` claim.
    pub fn expires_in(&self, now: OffsetDateTime) -> Option<Duration> {
        let exp = self.numeric_claim("exp")?;
        let remaining = exp.saturating_sub(now.unix_timestamp()).max(0);
        Some(Duration::from_secs(remaining as u64))
    }

    /// True once `exp` has passed. Tokens without `exp` never expire here.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.numeric_claim("exp")
            .is_some_and(|exp| exp <= now.unix_timestamp())
    }
}
