//! Session and token handling.
//!
//! The backend issues a JWT on login. The client stores it and reads its
//! payload to decide whether the user is logged in, who they are and which
//! role they hold. Those claims only gate the client UI; the backend is the
//! authority on every request.

pub mod jwt;
pub mod session;

pub use jwt::{ADMIN_ROLE, SessionClaims};
pub use session::{Session, TOKEN_KEY};

use thiserror::Error;

/// Token decoding errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No token stored")]
    MissingToken,

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Token signature rejected: {0}")]
    SignatureError(String),
}
