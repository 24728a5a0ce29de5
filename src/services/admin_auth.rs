//! Time-limited admin tokens of the form `<expiry_unix>.<hex hmac-sha256(expiry)>`.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("no token provided")]
    Missing,
    #[error("invalid token format")]
    Malformed,
    #[error("token expired")]
    Expired,
    #[error("invalid token signature")]
    BadSignature,
    #[error("token lifetime out of range")]
    ExpiryOutOfRange,
}

fn mac_for(secret: &str, expiry: i64) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(expiry.to_string().as_bytes());
    Some(mac)
}

/// Token lifetime from a count of seconds, as given on the command line or in config.
pub fn lifetime(secs: i64) -> Result<Duration, TokenError> {
    Duration::try_seconds(secs).ok_or(TokenError::ExpiryOutOfRange)
}

pub fn generate_token(
    secret: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, TokenError> {
    let expiry = now
        .checked_add_signed(ttl)
        .ok_or(TokenError::ExpiryOutOfRange)?
        .timestamp();
    let signature = mac_for(secret, expiry)
        .ok_or(TokenError::BadSignature)?
        .finalize()
        .into_bytes();
    Ok(format!("{expiry}.{}", hex::encode(signature)))
}

pub fn verify_token(secret: &str, token: &str, now: DateTime<Utc>) -> Result<(), TokenError> {
    if token.is_empty() {
        return Err(TokenError::Missing);
    }

    let (expiry, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
    let expiry: i64 = expiry.parse().map_err(|_| TokenError::Malformed)?;
    let signature = hex::decode(signature).map_err(|_| TokenError::Malformed)?;

    if now.timestamp() > expiry {
        return Err(TokenError::Expired);
    }

    mac_for(secret, expiry)
        .ok_or(TokenError::BadSignature)?
        .verify_slice(&signature)
        .map_err(|_| TokenError::BadSignature)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_admin_secret_key_for_testing_only";

    #[test]
    fn test_generated_token_verifies() {
        let now = Utc::now();
        let token = generate_token(SECRET, Duration::hours(1), now).unwrap();
        assert_eq!(token.split('.').count(), 2);
        assert_eq!(verify_token(SECRET, &token, now), Ok(()));
    }

    #[test]
    fn test_empty_and_malformed() {
        let now = Utc::now();
        assert_eq!(verify_token(SECRET, "", now), Err(TokenError::Missing));
        assert_eq!(verify_token(SECRET, "nodot", now), Err(TokenError::Malformed));
        assert_eq!(verify_token(SECRET, "abc.def", now), Err(TokenError::Malformed));
        assert_eq!(verify_token(SECRET, "123.zz", now), Err(TokenError::Malformed));
    }

    #[test]
    fn test_expired_token() {
        let issued = Utc::now() - Duration::hours(2);
        let token = generate_token(SECRET, Duration::hours(1), issued).unwrap();
        assert_eq!(verify_token(SECRET, &token, Utc::now()), Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_expiry_rejected() {
        let now = Utc::now();
        let token = generate_token(SECRET, Duration::hours(1), now).unwrap();
        let (_, sig) = token.split_once('.').unwrap();
        let forged = format!("{}.{sig}", (now + Duration::days(365)).timestamp());
        assert_eq!(verify_token(SECRET, &forged, now), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_other_secret_rejected() {
        let now = Utc::now();
        let token = generate_token("another-secret", Duration::hours(1), now).unwrap();
        assert_eq!(verify_token(SECRET, &token, now), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_huge_lifetime_is_an_error() {
        assert_eq!(lifetime(i64::MAX), Err(TokenError::ExpiryOutOfRange));
        assert_eq!(lifetime(3600), Ok(Duration::hours(1)));

        let now = Utc::now();
        let ttl = lifetime(i64::MAX / 1000).unwrap();
        assert_eq!(
            generate_token(SECRET, ttl, now),
            Err(TokenError::ExpiryOutOfRange)
        );
    }
}
