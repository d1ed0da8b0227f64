use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::Header;

use super::claims::Claims;
use super::errors::SigningError;
use super::key::SigningKey;
use super::SIGNING_ALGORITHM;

/// A signed access token and the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs access tokens with a fixed lifetime.
///
/// Uses HS256 (HMAC with SHA-256).
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: SigningKey,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Create a new token issuer.
    ///
    /// # Arguments
    /// * `key` - Shared signing secret
    /// * `lifetime` - Validity window of every issued token
    pub fn new(key: SigningKey, lifetime: Duration) -> Self {
        Self { key, lifetime }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `subject`, valid from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn issue(&self, subject: impl ToString) -> Result<IssuedToken, SigningError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token for `subject` as if the current time were `now`.
    ///
    /// # Arguments
    /// * `subject` - Identifier the token asserts
    /// * `now` - Issuance instant
    ///
    /// # Returns
    /// Compact `header.claims.signature` token and its expiration
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn issue_at(
        &self,
        subject: impl ToString,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, SigningError> {
        let claims = Claims::new(subject, now, self.lifetime)
            .ok_or_else(|| SigningError::EncodingFailed("expiration out of range".to_string()))?;
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| SigningError::EncodingFailed("expiration out of range".to_string()))?;

        let header = Header::new(SIGNING_ALGORITHM);
        let token = encode(&header, &claims, self.key.encoding_key())
            .map_err(|e| SigningError::EncodingFailed(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }
}
