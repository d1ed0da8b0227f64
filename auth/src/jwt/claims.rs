use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an access token.
///
/// Field names follow RFC 7519 so the token stays readable by standard JWT
/// tooling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user/entity identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject valid for `lifetime` from `issued_at`.
    ///
    /// # Arguments
    /// * `subject` - Unique subject identifier
    /// * `issued_at` - Issuance instant
    /// * `lifetime` - How long the token stays valid
    ///
    /// # Returns
    /// `None` when `issued_at + lifetime` is not a representable instant
    pub fn new(
        subject: impl ToString,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Option<Self> {
        let expiration = issued_at.checked_add_signed(lifetime)?;

        Some(Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        })
    }

    /// Check if token is expired.
    ///
    /// A token is still valid at exactly `exp + leeway_seconds`.
    pub fn is_expired(&self, current_timestamp: i64, leeway_seconds: i64) -> bool {
        self.exp.saturating_add(leeway_seconds) < current_timestamp
    }

    /// Expiration as a timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
