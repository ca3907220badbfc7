//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying `sub` (the identity), `iat` and `exp`.
//! Nothing is stored server-side; a token is valid while its signature
//! checks out against the configured secret and `exp` is still ahead of
//! the codec's clock.

pub mod clock;
pub mod identity;
pub mod token;

use thiserror::Error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use identity::Identity;
pub use token::{Claims, TokenCodec, DEFAULT_TOKEN_TTL_HOURS};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    ExpiredToken,

    #[error("token lifetime must be at least one second")]
    InvalidTtl,

    #[error("identity must not be empty")]
    EmptyIdentity,

    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}
