use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;
use super::key::SigningKey;
use super::SIGNING_ALGORITHM;

/// Verifies access tokens and extracts their subject.
///
/// Only HS256 is accepted whatever the token header claims. The signature is
/// checked over the raw `header.claims` bytes before the claims are decoded.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    key: SigningKey,
    validation: Validation,
    leeway_seconds: i64,
}

impl TokenValidator {
    /// Create a validator with no clock-skew leeway.
    pub fn new(key: SigningKey) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = vec![SIGNING_ALGORITHM];
        // Expiration is checked against the caller's clock in `verify_at`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            key,
            validation,
            leeway_seconds: 0,
        }
    }

    /// Tolerate `leeway` of clock skew past `exp`.
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway_seconds = leeway.num_seconds().max(0);
        self
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    /// * `Malformed` - Token is not a well-formed signed token
    /// * `SignatureInvalid` - Signature or algorithm does not match
    /// * `Expired` - Token lifetime has elapsed
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// # Arguments
    /// * `token` - Compact token string
    /// * `now` - Instant to check expiration against
    ///
    /// # Returns
    /// The subject identifier carried by the token
    ///
    /// # Errors
    /// * `Malformed` - Token is not a well-formed signed token
    /// * `SignatureInvalid` - Signature or algorithm does not match
    /// * `Expired` - Token lifetime has elapsed
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        if !has_compact_shape(token) {
            return Err(TokenError::Malformed);
        }

        let claims = decode::<Claims>(token, self.key.decoding_key(), &self.validation)?.claims;

        if claims.sub.is_empty() {
            return Err(TokenError::Malformed);
        }

        if claims.is_expired(now.timestamp(), self.leeway_seconds) {
            return Err(TokenError::Expired);
        }

        Ok(claims.sub)
    }
}

/// Exactly three non-empty dot-separated segments.
fn has_compact_shape(token: &str) -> bool {
    let mut segments = 0;
    for segment in token.split('.') {
        if segment.is_empty() {
            return false;
        }
        segments += 1;
    }
    segments == 3
}
