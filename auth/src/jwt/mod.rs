pub mod claims;
pub mod errors;
pub mod issuer;
pub mod key;
pub mod validator;

pub use claims::Claims;
pub use errors::SigningError;
pub use errors::TokenError;
pub use issuer::IssuedToken;
pub use issuer::TokenIssuer;
pub use key::SigningKey;
pub use validator::TokenValidator;

/// The only algorithm tokens are signed or accepted with.
pub(crate) const SIGNING_ALGORITHM: jsonwebtoken::Algorithm = jsonwebtoken::Algorithm::HS256;
