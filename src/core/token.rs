//! Signed, expiring bearer tokens
//!
//! Tokens are HS256 JSON Web Tokens. The issuer stamps `iat` and `exp` onto the
//! caller's claims; verification checks the signature before the expiry.

use crate::core::error::AuthError;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Claims payload carried by a token
pub type Claims = Map<String, Value>;

/// Issues and verifies tokens with a shared secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer").finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign `claims` with an expiration `ttl` from now
    pub fn issue(&self, claims: Claims, ttl: Duration) -> Result<String, AuthError> {
        self.issue_at(claims, ttl, Utc::now().timestamp())
    }

    /// Sign `claims` as if the current time were `now` (unix seconds)
    pub fn issue_at(&self, mut claims: Claims, ttl: Duration, now: i64) -> Result<String, AuthError> {
        let exp = now
            .checked_add(ttl.num_seconds())
            .ok_or_else(|| AuthError::Signing("expiration overflows".to_string()))?;

        claims.insert("iat".to_string(), Value::from(now));
        claims.insert("exp".to_string(), Value::from(exp));

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token as if the current time were `now` (unix seconds)
    ///
    /// A token is expired once `now >= exp`; no leeway is applied.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Self::validation()).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::SignatureInvalid,
                _ => AuthError::Malformed,
            },
        )?;

        let exp = data
            .claims
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or(AuthError::Malformed)?;

        if now >= exp {
            return Err(AuthError::Expired);
        }

        Ok(data.claims)
    }

    // Expiry is checked by hand so the boundary is exact.
    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);
        validation
    }
}
