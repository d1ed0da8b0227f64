//! Authentication utilities library
//!
//! Provides the credential and token primitives behind the shop API:
//! - Password hashing (Argon2id, constant-time verification)
//! - Access token issuance and validation (HS256 JWT)
//! - Authentication coordination
//!
//! Nothing here touches HTTP or storage; the service crate adapts these types.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{SigningKey, TokenIssuer, TokenValidator};
//! use chrono::Duration;
//!
//! let key = SigningKey::from_secret(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let issuer = TokenIssuer::new(key.clone(), Duration::hours(24));
//! let validator = TokenValidator::new(key);
//!
//! let issued = issuer.issue(42).unwrap();
//! assert_eq!(validator.verify(&issued.token).unwrap(), "42");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, SigningKey};
//! use chrono::Duration;
//!
//! let key = SigningKey::from_secret(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(key, Duration::hours(24));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("password123", &hash, 42).unwrap();
//!
//! // Validate token
//! let subject = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(subject, "42");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::SigningError;
pub use jwt::SigningKey;
pub use jwt::TokenError;
pub use jwt::TokenIssuer;
pub use jwt::TokenValidator;
pub use password::HashCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
