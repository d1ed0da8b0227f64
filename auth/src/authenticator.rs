use std::hint::black_box;
use std::sync::Arc;
use std::sync::OnceLock;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::IssuedToken;
use crate::jwt::SigningError;
use crate::jwt::SigningKey;
use crate::jwt::TokenError;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenValidator;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
///
/// Immutable once built, so a single instance can be shared across requests
/// behind an `Arc`.
#[derive(Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    token_validator: TokenValidator,
    // Hashed lazily with `password_hasher`'s cost; shared by clones.
    decoy_hash: Arc<OnceLock<String>>,
}

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
    /// Instant after which the token is rejected
    pub expires_at: DateTime<Utc>,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Signing error: {0}")]
    SigningError(#[from] SigningError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `signing_key` - Secret key for token signing
    /// * `token_lifetime` - Validity window of issued tokens
    ///
    /// # Returns
    /// Authenticator with the default password cost and no expiration leeway
    pub fn new(signing_key: SigningKey, token_lifetime: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_issuer: TokenIssuer::new(signing_key.clone(), token_lifetime),
            token_validator: TokenValidator::new(signing_key),
            decoy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Replace the password hasher (e.g. to apply a configured cost).
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self.decoy_hash = Arc::new(OnceLock::new());
        self
    }

    /// Tolerate clock skew when checking expiration.
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.token_validator = self.token_validator.with_leeway(leeway);
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Do the work of a password check when there is no account to check
    /// against.
    ///
    /// Callers that found no stored hash run this before rejecting, so an
    /// unknown account costs as much as a wrong password.
    pub fn simulate_password_check(&self, password: &str) {
        let decoy = self.decoy_hash.get_or_init(|| {
            self.password_hasher
                .hash(DECOY_PASSWORD)
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Failed to hash decoy password");
                    String::new()
                })
        });
        black_box(self.password_hasher.verify(password, decoy));
    }

    /// Verify credentials and generate an access token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Identifier the token will assert
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match (or the hash is unusable)
    /// * `SigningError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: impl ToString,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let issued = self.token_issuer.issue(subject)?;

        Ok(AuthenticationResult {
            access_token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    /// Generate a token without password verification.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn generate_token(&self, subject: impl ToString) -> Result<IssuedToken, SigningError> {
        self.token_issuer.issue(subject)
    }

    /// Validate a token and return its subject.
    ///
    /// # Errors
    /// * `Malformed`, `SignatureInvalid`, `Expired` - see `TokenValidator::verify`
    pub fn validate_token(&self, token: &str) -> Result<String, TokenError> {
        self.token_validator.verify(token)
    }

    pub fn token_issuer(&self) -> &TokenIssuer {
        &self.token_issuer
    }

    pub fn token_validator(&self) -> &TokenValidator {
        &self.token_validator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::HashCost;

    fn authenticator() -> Authenticator {
        let key = SigningKey::from_secret(b"test_secret_key_at_least_32_bytes!")
            .expect("Failed to build key");
        let hasher = PasswordHasher::with_cost(HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build hasher");

        Authenticator::new(key, Duration::hours(24)).with_password_hasher(hasher)
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();

        // Hash a password
        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        // Authenticate with correct password
        let result = authenticator
            .authenticate(password, &hash, 42)
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());
        assert!(result.expires_at > Utc::now());

        // Validate the token
        let subject = authenticator
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(subject, "42");
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        // Try with wrong password
        let result = authenticator.authenticate("wrong_password", &hash, 42);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_corrupt_hash_is_invalid_credentials() {
        let result = authenticator().authenticate("my_password", "not-a-phc-string", 42);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_simulated_check_hashes_decoy_with_configured_cost() {
        let authenticator = authenticator();
        assert!(authenticator.decoy_hash.get().is_none());

        authenticator.simulate_password_check("anything");
        authenticator.simulate_password_check(DECOY_PASSWORD);

        let decoy = authenticator.decoy_hash.get().expect("Decoy was not hashed");
        assert!(decoy.starts_with("$argon2id$"));
        assert!(decoy.contains("m=1024,t=1,p=1"));
    }

    #[test]
    fn test_replacing_hasher_resets_decoy() {
        let authenticator = authenticator();
        authenticator.simulate_password_check("anything");

        let hasher = PasswordHasher::with_cost(HashCost {
            memory_kib: 2048,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build hasher");
        let authenticator = authenticator.with_password_hasher(hasher);
        assert!(authenticator.decoy_hash.get().is_none());

        authenticator.simulate_password_check("anything");
        assert!(authenticator
            .decoy_hash
            .get()
            .is_some_and(|decoy| decoy.contains("m=2048,t=1,p=1")));
    }

    #[test]
    fn test_generate_and_validate_token() {
        let authenticator = authenticator();

        let issued = authenticator
            .generate_token("user123")
            .expect("Failed to generate token");

        let subject = authenticator
            .validate_token(&issued.token)
            .expect("Failed to validate token");
        assert_eq!(subject, "user123");
    }

    #[test]
    fn test_validate_invalid_token() {
        let result = authenticator().validate_token("invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_round_trip_then_expiry() {
        let authenticator = authenticator();
        let now = Utc::now();

        let issued = authenticator
            .token_issuer()
            .issue_at(42, now)
            .expect("Failed to issue token");

        assert_eq!(
            authenticator.token_validator().verify_at(&issued.token, now),
            Ok("42".to_string())
        );

        let later = now + authenticator.token_issuer().lifetime() + Duration::seconds(1);
        assert_eq!(
            authenticator.token_validator().verify_at(&issued.token, later),
            Err(TokenError::Expired)
        );
    }
}
