use crate::error::{VideoError, VideoResult};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const MAX_CLOCK_SKEW_SECS: i64 = 60 * 5;

pub fn sign_invocation(secret: &str, timestamp: &str, body: &str) -> VideoResult<String> {
    let base_string = format!("v0:{}:{}", timestamp, body);
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| VideoError::InvalidSignature)?;
    mac.update(base_string.as_bytes());
    Ok(format!("v0={}", hex::encode(mac.finalize().into_bytes())))
}

pub fn verify_invocation_signature(
    secret: &str,
    timestamp: &str,
    body: &str,
    signature: &str,
) -> VideoResult<()> {
    verify_at(secret, timestamp, body, signature, chrono::Utc::now().timestamp())
}

fn verify_at(
    secret: &str,
    timestamp: &str,
    body: &str,
    signature: &str,
    now: i64,
) -> VideoResult<()> {
    // Reject stale or future-dated invocations (replay protection)
    let request_time = timestamp
        .parse::<i64>()
        .map_err(|_| VideoError::InvalidSignature)?;
    let is_stale = now
        .checked_sub(request_time)
        .map_or(true, |age| age > MAX_CLOCK_SKEW_SECS);
    if request_time > now || is_stale {
        return Err(VideoError::InvalidSignature);
    }

    let base_string = format!("v0:{}:{}", timestamp, body);
    let expected = signature
        .strip_prefix("v0=")
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
        .ok_or(VideoError::InvalidSignature)?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| VideoError::InvalidSignature)?;
    mac.update(base_string.as_bytes());
    mac.verify_slice(&expected)
        .map_err(|_| VideoError::InvalidSignature)
}
