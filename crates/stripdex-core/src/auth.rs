//! Admin token issuance and verification.
//!
//! Tokens are HS256-signed JWTs with a fixed admin subject and a TTL taken
//! from gateway configuration. The signing secret is a process constant;
//! there is no refresh flow, expired tokens require a new login.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// token sign key
const SECRET: &[u8] = b"something secret here";
// token subject
const ADMIN_ROLE: &str = "superuser";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: u64,
    exp: u64,
}

/// Issue a signed admin token valid for `ttl`.
pub fn issue_token(ttl: Duration) -> Result<String> {
    let now = unix_now();
    let claims = Claims {
        sub: ADMIN_ROLE.to_string(),
        iat: now,
        exp: now.saturating_add(ttl.as_secs()),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET),
    )
    .map_err(|err| Error::Internal(anyhow::anyhow!("failed to sign token: {err}")))
}

/// Verify signature, expiry, and subject of a token.
pub fn verify_token(token: &str) -> Result<()> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(SECRET), &validation)
        .map_err(|_| Error::Unauthorized)?;

    if data.claims.sub != ADMIN_ROLE {
        return Err(Error::Unauthorized);
    }

    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let token = issue_token(Duration::from_secs(60)).unwrap();
        verify_token(&token).unwrap();
    }

    #[test]
    fn tampered_token_fails() {
        let token = issue_token(Duration::from_secs(60)).unwrap();

        // Alter the claims segment; the signature no longer matches.
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        let claims = &mut parts[1];
        let replacement = if claims.starts_with('A') { "B" } else { "A" };
        claims.replace_range(0..1, replacement);
        let tampered = parts.join(".");

        assert!(matches!(
            verify_token(&tampered),
            Err(Error::Unauthorized)
        ));
    }

    #[test]
    fn garbage_token_fails() {
        assert!(matches!(
            verify_token("not-a-token"),
            Err(Error::Unauthorized)
        ));
    }

    #[test]
    fn expired_token_fails() {
        let now = unix_now();
        let claims = Claims {
            sub: ADMIN_ROLE.to_string(),
            iat: now.saturating_sub(7200),
            exp: now.saturating_sub(3600),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(matches!(verify_token(&token), Err(Error::Unauthorized)));
    }

    #[test]
    fn wrong_subject_fails() {
        let now = unix_now();
        let claims = Claims {
            sub: "guest".to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(matches!(verify_token(&token), Err(Error::Unauthorized)));
    }
}
