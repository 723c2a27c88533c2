//! Reads claims from a JWT without verifying it. The console only uses this
//! to decide whether to refresh before restoring a session.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds of leeway applied when checking expiry.
pub const EXPIRY_SKEW_SECS: i64 = 30;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl Claims {
    /// True when `exp` is at or before `now + skew`. Tokens without `exp`
    /// never count as expired here.
    #[must_use]
    pub fn is_expired_at(&self, now: i64, skew: i64) -> bool {
        self.exp.is_some_and(|exp| exp <= now.saturating_add(skew))
    }
}

/// Decodes the payload segment. Returns `None` for anything that is not a
/// three-part token with a JSON payload.
#[must_use]
pub fn decode_claims(token: &str) -> Option<Claims> {
    let mut parts = token.trim().split('.');
    let (_, payload, _) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let bytes = Base64UrlUnpadded::decode_vec(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Whether the token is expired now, with [`EXPIRY_SKEW_SECS`] of leeway.
/// Undecodable tokens are left for the backend to reject.
#[must_use]
pub fn is_expired(token: &str) -> bool {
    decode_claims(token).is_some_and(|claims| claims.is_expired_at(unix_now(), EXPIRY_SKEW_SECS))
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
}
