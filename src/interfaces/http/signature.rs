use crate::error::{BookingError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a signed payload before it is rejected as a replay.
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

/// Verifies a processor signature header of the form `t=<unix>,v1=<hex>`.
///
/// The signed payload is `"{t}.{body}"`, HMAC-SHA256 under the endpoint
/// secret. Secrets may carry the processor's `whsec_` prefix.
pub fn verify_signature(
    secret: &str,
    header: &str,
    payload: &[u8],
    now_unix: i64,
) -> Result<()> {
    let mut timestamp: Option<i64> = None;
    let mut v1_signature: Option<&str> = None;

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => v1_signature = Some(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(BookingError::InvalidSignature)?;
    let v1_signature = v1_signature.ok_or(BookingError::InvalidSignature)?;

    if (now_unix - timestamp).abs() > TIMESTAMP_TOLERANCE_SECS {
        return Err(BookingError::InvalidSignature);
    }

    let secret_key = secret.strip_prefix("whsec_").unwrap_or(secret);
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|_| BookingError::InvalidSignature)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let computed = hex::encode(mac.finalize().into_bytes());

    if computed != v1_signature {
        return Err(BookingError::InvalidSignature);
    }
    Ok(())
}

/// Produces the `t=...,v1=...` header value for a payload; the counterpart
/// of `verify_signature`, used by tests and local tooling.
pub fn sign_payload(secret: &str, payload: &[u8], timestamp: i64) -> String {
    let secret_key = secret.strip_prefix("whsec_").unwrap_or(secret);
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    #[test]
    fn test_round_trip_verification() {
        let payload = br#"{"id":"evt_1"}"#;
        let header = sign_payload(SECRET, payload, 1_700_000_000);
        assert!(verify_signature(SECRET, &header, payload, 1_700_000_000).is_ok());
        // Within tolerance.
        assert!(verify_signature(SECRET, &header, payload, 1_700_000_200).is_ok());
    }

    #[test]
    fn test_rejects_stale_timestamp() {
        let payload = b"{}";
        let header = sign_payload(SECRET, payload, 1_700_000_000);
        assert!(matches!(
            verify_signature(SECRET, &header, payload, 1_700_000_000 + 301),
            Err(BookingError::InvalidSignature)
        ));
    }

    #[test]
    fn test_rejects_tampered_payload() {
        let header = sign_payload(SECRET, b"{}", 1_700_000_000);
        assert!(verify_signature(SECRET, &header, b"{ }", 1_700_000_000).is_err());
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let header = sign_payload(SECRET, b"{}", 1_700_000_000);
        assert!(verify_signature("whsec_other", &header, b"{}", 1_700_000_000).is_err());
    }

    #[test]
    fn test_rejects_malformed_header() {
        assert!(verify_signature(SECRET, "v1=abc", b"{}", 0).is_err());
        assert!(verify_signature(SECRET, "t=123", b"{}", 123).is_err());
        assert!(verify_signature(SECRET, "", b"{}", 0).is_err());
    }
}
